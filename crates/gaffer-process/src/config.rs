//! YAML process definitions.
//!
//! ```yaml
//! name: web
//! working_directory: ./app
//! command: ["bundle", "exec", "puma"]
//! port: 5000
//! environment:
//!   RACK_ENV: production
//! ```

use crate::environment::Environment;
use crate::validation::{validate_command, validate_process_name};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative description of a single supervised process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessSpec {
    pub name: String,
    #[serde(default = "default_working_directory")]
    pub working_directory: PathBuf,
    pub command: Vec<String>,
    pub port: u16,
    /// Variables overlaid on the supervisor's environment.
    #[serde(default, skip_serializing_if = "Environment::is_empty")]
    pub environment: Environment,
}

fn default_working_directory() -> PathBuf {
    PathBuf::from(".")
}

impl ProcessSpec {
    /// Load a process definition from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load a process definition from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let spec: ProcessSpec =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        validate_process_name(&self.name)?;
        validate_command(&self.name, &self.command)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_spec() {
        let yaml = r#"
name: web
working_directory: /srv/app
command: ["bundle", "exec", "puma"]
port: 5000
environment:
  RACK_ENV: production
"#;

        let spec = ProcessSpec::load_from_string(yaml).unwrap();
        assert_eq!(spec.name, "web");
        assert_eq!(spec.working_directory, PathBuf::from("/srv/app"));
        assert_eq!(spec.command, vec!["bundle", "exec", "puma"]);
        assert_eq!(spec.port, 5000);
        assert_eq!(spec.environment.get("RACK_ENV").map(String::as_str), Some("production"));
    }

    #[test]
    fn test_defaults() {
        let spec = ProcessSpec::load_from_string("name: worker\ncommand: [sleep, '5']\nport: 0\n").unwrap();
        assert_eq!(spec.working_directory, PathBuf::from("."));
        assert!(spec.environment.is_empty());
    }

    #[test]
    fn test_rejects_empty_command() {
        let err = ProcessSpec::load_from_string("name: web\ncommand: []\nport: 80\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Command cannot be empty"));
    }

    #[test]
    fn test_rejects_port_out_of_range() {
        assert!(ProcessSpec::load_from_string("name: web\ncommand: [echo]\nport: 70000\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: clock\ncommand: [date]\nport: 9000").unwrap();

        let spec = ProcessSpec::load_from_file(file.path()).unwrap();
        assert_eq!(spec.name, "clock");
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = ProcessSpec::load_from_file("/nonexistent/gaffer.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
