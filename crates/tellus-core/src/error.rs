//! The single failure channel of the pipeline.

use thiserror::Error;

/// Everything that can abort planet generation.
///
/// Numeric degeneracies (zero-length normals, polar frames, empty distance
/// queues) are recovered locally inside the stages and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input mesh failed structural validation.
    #[error("mesh rejected: {0}")]
    MeshRejected(String),

    /// A parameter fell outside its quantization table.
    #[error("parameter `{0}` out of range")]
    ParamOutOfRange(&'static str),

    /// The host cancelled generation at a stage checkpoint.
    #[error("generation cancelled")]
    Cancelled,

    /// An invariant broke mid-pipeline; the partial planet is discarded.
    #[error("internal failure in stage `{stage}`: {detail}")]
    Internal { stage: &'static str, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_stage() {
        let e = PipelineError::Internal { stage: "elevation", detail: "NaN at region 7".into() };
        let msg = e.to_string();
        assert!(msg.contains("elevation") && msg.contains("region 7"), "got: {msg}");
    }
}
