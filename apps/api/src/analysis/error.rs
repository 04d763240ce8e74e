use thiserror::Error;

/// Failure kinds surfaced by the analysis pipeline.
///
/// `UnsupportedFormat` and `ExtractionFailure` abort an analysis call.
/// `RenderFailure` never escapes `extract_and_analyze`; it only shows up as a
/// missing word-cloud path on the result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Could not extract text from document: {0}")]
    ExtractionFailure(String),

    #[error("Word cloud rendering failed: {0}")]
    RenderFailure(String),
}
