//! Child environment computation.
//!
//! The child's environment is computed as a pure transform: snapshot the
//! supervisor's environment, hand it to an [`EnvironmentEnhancer`], then force
//! `PORT` to the configured port. The override always runs last, so no
//! enhancer can suppress it.
//!
//! The child inherits the supervisor's environment and only the differences
//! between the snapshot and the enhanced mapping are applied on top
//! ([`environment_changes`]). Variables that are not valid Unicode never show
//! up in the snapshot, so they pass through to the child untouched.

use std::collections::HashMap;

/// Environment variable mapping passed to a child process.
pub type Environment = HashMap<String, String>;

/// Variable that always carries the configured port.
pub const PORT_VAR: &str = "PORT";

/// Computes the variables a child should see, given a base set.
///
/// Implementations are shared between handles (`Arc<dyn EnvironmentEnhancer>`)
/// and must not rely on being called only once.
pub trait EnvironmentEnhancer: Send + Sync {
    fn enhance(&self, base: Environment) -> Environment;
}

impl<F> EnvironmentEnhancer for F
where
    F: Fn(Environment) -> Environment + Send + Sync,
{
    fn enhance(&self, base: Environment) -> Environment {
        self(base)
    }
}

/// Leaves the base environment untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl EnvironmentEnhancer for PassThrough {
    fn enhance(&self, base: Environment) -> Environment {
        base
    }
}

/// Adds fixed variables on top of the base environment, replacing existing keys.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    vars: Environment,
}

impl Overlay {
    pub fn new(vars: Environment) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &Environment {
        &self.vars
    }
}

impl EnvironmentEnhancer for Overlay {
    fn enhance(&self, mut base: Environment) -> Environment {
        base.extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        base
    }
}

/// Snapshot of the supervisor's own environment.
///
/// Variables whose name or value is not valid Unicode are left out of the
/// snapshot; the child still inherits them.
pub fn base_environment() -> Environment {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Apply `enhancer` to `base`, then force `PORT=<port>`.
pub fn effective_environment(
    enhancer: &dyn EnvironmentEnhancer,
    base: Environment,
    port: u16,
) -> Environment {
    let mut environment = enhancer.enhance(base);
    environment.insert(PORT_VAR.to_string(), port.to_string());
    environment
}

/// Edits that turn an inherited environment into the effective one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentChanges {
    /// Keys present in the base snapshot but dropped by the enhancer.
    pub removed: Vec<String>,
    /// Keys added or given a new value.
    pub set: Vec<(String, String)>,
}

/// Compute the edits from `base` to `effective`, sorted by key.
pub fn environment_changes(base: &Environment, effective: &Environment) -> EnvironmentChanges {
    let mut removed: Vec<String> = base
        .keys()
        .filter(|key| !effective.contains_key(*key))
        .cloned()
        .collect();
    removed.sort();

    let mut set: Vec<(String, String)> = effective
        .iter()
        .filter(|(key, value)| base.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    set.sort();

    EnvironmentChanges { removed, set }
}
