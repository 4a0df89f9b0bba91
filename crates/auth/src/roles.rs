use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role carried by an account and embedded in its tokens.
///
/// The set is closed: there is no policy source mapping arbitrary role names to
/// permissions, so an unknown name is an input error rather than an empty grant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Moderator,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role '{0}': expected one of client, moderator")]
pub struct InvalidRole(pub String);

impl Role {
    pub const ALL: [Role; 2] = [Role::Client, Role::Moderator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "client" => Ok(Role::Client),
            "moderator" => Ok(Role::Moderator),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
