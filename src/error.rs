use thiserror::Error;

/// Failure delivered by [`render`](crate::JinjaTemplateEngine::render).
///
/// No partial output accompanies a failure: the render call either yields
/// the complete buffer or one of these.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The configured template mode is not one of `HTML`, `XML` or `TEXT`.
    #[error("unsupported template mode '{0}'")]
    UnsupportedMode(String),
    /// Loading, parsing or evaluating the template failed. Loader faults
    /// are carried as the error source.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    /// The render worker panicked or was aborted.
    #[error("render task canceled: {0}")]
    Canceled(#[from] tokio::task::JoinError),
}

impl RenderError {
    /// True when the failure was a missing template source.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RenderError::Template(e) if e.kind() == minijinja::ErrorKind::TemplateNotFound
        )
    }
}
