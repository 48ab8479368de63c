use serde::{Deserialize, Serialize};

/// The two children a caregiver can describe to the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Mia,
    Luna,
}

impl Subject {
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Mia => "Mia",
            Subject::Luna => "Luna",
        }
    }
}
