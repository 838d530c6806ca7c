//! Session error types.

/// Startup failures. Everything past startup degrades to silent
/// per-link no-ops instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A feature references a region with no registered handler. This is
    /// an internal wiring defect and halts initialization loudly.
    #[error("invalid region handler wiring: {0}")]
    MissingHandler(&'static str),

    /// The options store failed to produce an options map.
    #[error("failed to load options: {0}")]
    Options(#[from] anyhow::Error),
}
