/// Errors from saving or loading a performance report.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("failed to read or write report file")]
    Io(#[from] std::io::Error),
    #[error("malformed report JSON")]
    Json(#[from] serde_json::Error),
}

/// An unknown detection-mode name.
///
/// Mode names form a closed set; a typo yields this error instead of a
/// silently empty rule list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown detection mode `{0}`")]
pub struct ParseModeError(pub String);
