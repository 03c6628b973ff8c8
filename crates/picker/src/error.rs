use thiserror::Error;

pub type Result<T> = std::result::Result<T, PickerError>;

/// Failures of the driver itself. Collaborator errors never surface here; they
/// become picker state (`LoadPhase::Failed`, `notice`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("Picker was unmounted")]
    Unmounted,

    #[error("{0} was cancelled by unmount")]
    Cancelled(&'static str),
}
