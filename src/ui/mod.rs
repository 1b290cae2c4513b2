pub mod icons;
pub mod log_view;
pub mod report;

pub use log_view::{LineKind, LiveLogView, LogBuffer, LogLine, ViewMode, ViewStatus};
