use serde::{Deserialize, Serialize};

/// File selected by a user in the Files app, as posted to the action handler.
///
/// Only `name`, `directory` and the caller's identity drive the pipeline; the
/// remaining fields are accepted so the payload parses as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileActionInfo {
    pub file_id: i64,
    pub name: String,
    pub directory: String,
    pub etag: String,
    pub mime: String,
    pub file_type: String,
    pub mtime: i64,
    pub size: i64,
    pub user_id: String,
    pub instance_id: String,
}
