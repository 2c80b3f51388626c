//! Validation of process construction inputs.

use gaffer_common::{ProcessError, ProcessResult};

/// Validate a process name.
///
/// Any non-empty string is accepted; names are free-form identifiers.
pub fn validate_process_name(name: &str) -> ProcessResult<()> {
    if name.is_empty() {
        return Err(ProcessError::configuration(
            "validation",
            "Process name cannot be empty",
        ));
    }

    Ok(())
}

/// Validate that a command has a non-empty program.
pub fn validate_command(name: &str, command: &[String]) -> ProcessResult<()> {
    match command.first() {
        None => Err(ProcessError::configuration(name, "Command cannot be empty")),
        Some(program) if program.is_empty() => Err(ProcessError::configuration(
            name,
            "Executable path cannot be empty",
        )),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_form_names_are_accepted() {
        assert!(validate_process_name("web").is_ok());
        assert!(validate_process_name("web.1").is_ok());
        assert!(validate_process_name("has space").is_ok());
        assert!(validate_process_name("api/v2").is_ok());
        assert!(validate_process_name("café").is_ok());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            validate_process_name(""),
            Err(ProcessError::Configuration { .. })
        ));
    }

    #[test]
    fn test_command_validation() {
        assert!(validate_command("web", &["echo".to_string()]).is_ok());
        assert!(validate_command("web", &[]).is_err());
        assert!(validate_command("web", &[String::new(), "arg".to_string()]).is_err());
    }
}
