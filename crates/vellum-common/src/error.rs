//! Error types shared across the vellum crates.

use miette::Diagnostic;

/// Failures surfaced to the user from store-backed widget actions.
///
/// Content problems (broken links, malformed to-do lines, bad calc
/// expressions) are never errors - they degrade visually. This enum only
/// covers the operations that talk to the host's storage or upload plumbing,
/// which must report failure without leaving partial in-memory mutations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum VellumError {
    /// Persisting the source buffer to the host store failed.
    #[error("failed to persist page content: {0}")]
    #[diagnostic(code(vellum::persist))]
    Persist(String),

    /// A media upload could not be completed.
    #[error("upload failed: {0}")]
    #[diagnostic(code(vellum::upload))]
    Upload(String),
}
