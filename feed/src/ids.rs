use std::fmt;

use serde::{Deserialize, Serialize};

/// The `FlightID` property of a trajectory feature. Matched exactly, never by substring.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightID(String);

impl FlightID {
    pub fn new<I: Into<String>>(id: I) -> Self {
        Self(id.into())
    }

    // Feature properties aren't typed; numeric IDs show up too
    pub(crate) fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(x) => Some(Self(x.trim().to_string())),
            serde_json::Value::Number(x) => Some(Self(x.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for FlightID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
