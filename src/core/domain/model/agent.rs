use serde::Serialize;

/// Outcome of a guest filesystem trim.
///
/// Unlike every other operation, a failed trim is reported as a value: the
/// guest agent is frequently absent or not running, and callers trimming a
/// batch of VMs want to carry on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FstrimResult {
    /// The agent's answer, e.g. `{"result": {"paths": [...]}}`.
    Completed(serde_json::Value),
    /// The error that prevented the trim.
    Failed { error: String },
}

impl FstrimResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, FstrimResult::Completed(_))
    }

    /// The failure description, if the trim failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            FstrimResult::Completed(_) => None,
            FstrimResult::Failed { error } => Some(error),
        }
    }
}
