use std::str::FromStr;
use thiserror::Error;

/// Behavioral mode of `nekoray-updater`, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Updater,
    Launcher,
    Unrecognized,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("invocation name '{0}' matches both updater and launcher; pass --role to choose")]
    Ambiguous(String),
    #[error("unknown role '{0}' (expected 'updater' or 'launcher')")]
    Unknown(String),
}

/// Classify the invocation identity (base name of `argv[0]`).
///
/// Case-insensitive substring match. A name carrying both keywords is
/// rejected rather than resolved by precedence.
pub fn detect_role(identity: &str) -> Result<Role, RoleError> {
    let lower = identity.to_lowercase();
    match (lower.contains("updater"), lower.contains("launcher")) {
        (true, true) => Err(RoleError::Ambiguous(identity.to_string())),
        (true, false) => Ok(Role::Updater),
        (false, true) => Ok(Role::Launcher),
        (false, false) => Ok(Role::Unrecognized),
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "updater" => Ok(Role::Updater),
            "launcher" => Ok(Role::Launcher),
            _ => Err(RoleError::Unknown(s.to_string())),
        }
    }
}
