use serde::Serialize;

/// Lifecycle of a tag occurrence as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Finished,
    Pending,
    Aborted,
}

impl TagStatus {
    pub fn label(&self) -> &str {
        match self {
            TagStatus::Finished => "finished",
            TagStatus::Pending  => "pending",
            TagStatus::Aborted  => "aborted",
        }
    }
}

/// A tag closed in the text is finished. An unclosed one is pending while the
/// model is still generating and aborted once generation has stopped.
pub fn resolve_status(in_progress: bool, stream_active: bool) -> TagStatus {
    match (in_progress, stream_active) {
        (false, _)    => TagStatus::Finished,
        (true, true)  => TagStatus::Pending,
        (true, false) => TagStatus::Aborted,
    }
}
