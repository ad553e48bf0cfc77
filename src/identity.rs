//! Student resolution for Pathway commands.
//!
//! Every command that reads or writes a learning state needs to know whose
//! state it is. Rather than requiring `--student` on every invocation, the
//! student is resolved through a chain:
//!
//! 1. `--student <id>`: explicit per-command override
//! 2. `PATHWAY_STUDENT` env var: process/session level
//! 3. `default-student` in `~/.pathway/config.toml`

use std::env;

use crate::config::Config;

/// Environment variable consulted when `--student` is absent.
pub const STUDENT_ENV: &str = "PATHWAY_STUDENT";

/// Error message shown when the student cannot be resolved.
pub const STUDENT_REQUIRED: &str = "student required: pass --student <id>, \
    set PATHWAY_STUDENT, or add `default-student = \"...\"` to ~/.pathway/config.toml";

/// Resolve the acting student from the tiered resolution chain.
///
/// Returns an error with [`STUDENT_REQUIRED`] when none of the sources
/// yield a value.
pub fn resolve_student(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    let from_env = env::var(STUDENT_ENV).ok();
    resolve_from(explicit, from_env.as_deref(), config)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    config: &Config,
) -> Result<String, String> {
    [explicit, from_env, config.default_student.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| STUDENT_REQUIRED.to_string())
}
