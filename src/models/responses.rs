use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub status: String,
}

impl HeartbeatResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }
}

/// Reply to the enable/disable toggle; `error` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledResponse {
    pub error: String,
}
