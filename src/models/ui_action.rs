use serde::{Deserialize, Serialize};

/// Name under which the files-menu action is registered
pub const OCR_ACTION_NAME: &str = "ocr_text";

/// Route on this service the platform calls when the action is picked
pub const OCR_ACTION_HANDLER: &str = "/ocr_text";

/// Descriptor registered with the platform to show the action in the Files app menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesActionMenu {
    pub name: String,
    pub display_name: String,
    pub mime: String,
    pub permissions: u32,
    pub action_handler: String,
}

impl FilesActionMenu {
    pub fn ocr_text() -> Self {
        Self {
            name: OCR_ACTION_NAME.to_string(),
            display_name: "Optical Text".to_string(),
            mime: "image/png, image/jpeg".to_string(),
            permissions: 31,
            action_handler: OCR_ACTION_HANDLER.to_string(),
        }
    }
}

/// Body of the unregistration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesActionMenuRemoval {
    pub name: String,
}
