use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PromptError;

/// Expert role wrapping the user's question, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Health,
    Legal,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Health, Persona::Legal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Legal => "legal",
        }
    }
}

impl FromStr for Persona {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(Self::Health),
            "legal" => Ok(Self::Legal),
            other => Err(PromptError::UnknownPersona(other.to_string())),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
