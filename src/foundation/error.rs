/// Convenience result type used across the crate.
pub type PfpResult<T> = Result<T, PfpError>;

/// Top-level error taxonomy for the compositing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PfpError {
    /// `generate` was called with no source image selected.
    #[error("no source image selected")]
    MissingInput,

    /// A generation cycle is already in flight on this compositor.
    #[error("a generation cycle is already in progress")]
    Busy,

    /// The background-removal capability failed.
    #[error("background removal failed: {0}")]
    Processing(String),

    /// An image payload could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The composited surface could not be encoded.
    #[error("image encode failed: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PfpError {
    /// Build a [`PfpError::Processing`] value.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Build a [`PfpError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PfpError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert_eq!(
            PfpError::MissingInput.to_string(),
            "no source image selected"
        );
        assert_eq!(
            PfpError::Busy.to_string(),
            "a generation cycle is already in progress"
        );
        assert!(
            PfpError::processing("x")
                .to_string()
                .contains("background removal failed:")
        );
        assert!(
            PfpError::decode("x")
                .to_string()
                .contains("image decode failed:")
        );
        assert!(
            PfpError::encode("x")
                .to_string()
                .contains("image encode failed:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PfpError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
