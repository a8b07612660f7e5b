// Payloads exchanged with the Nextcloud AppAPI

pub mod file_action;
pub mod responses;
pub mod ui_action;

pub use file_action::*;
pub use responses::*;
pub use ui_action::*;
