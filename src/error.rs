//! Error types.
//!
//! Two layers:
//!
//! - [`MarginError`]: the closed set of failures the detection/fitting core can raise.
//!   Callers branch on the variant (e.g. lower the degree on `DegenerateFit`).
//! - [`AppError`]: what the binary reports, carrying a process exit code.

use thiserror::Error;

/// Result type for the detection and fitting core.
pub type MarginResult<T> = Result<T, MarginError>;

/// Which collection was too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// The sampled point set handed to the classifier.
    PointSet,
    /// The edge candidates handed to the curve fitter.
    EdgeCandidates,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::PointSet => write!(f, "point set"),
            InputKind::EdgeCandidates => write!(f, "edge candidate set"),
        }
    }
}

/// Failures of the classifier and the curve fitter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarginError {
    /// Fewer points than the operation needs (`k` for the classifier, `degree + 1`
    /// for the fitter).
    #[error("insufficient input: {kind} needs at least {required} points, got {actual}")]
    InsufficientInput {
        kind: InputKind,
        required: usize,
        actual: usize,
    },

    /// The polynomial design matrix is rank deficient.
    #[error(
        "degenerate fit: degree {degree} needs rank {required}, design matrix has rank {rank}; \
         try a lower degree or a larger threshold"
    )]
    DegenerateFit {
        degree: usize,
        rank: usize,
        required: usize,
    },

    /// The classifier flagged no point at all.
    #[error("no edge candidates found (k={k}, threshold={threshold}); try a larger threshold")]
    EmptyResult { k: usize, threshold: f64 },

    /// A parameter or coordinate is outside its domain.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl MarginError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MarginError::InvalidParameter {
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<MarginError> for AppError {
    fn from(err: MarginError) -> Self {
        let exit_code = match err {
            MarginError::InvalidParameter { .. } => 2,
            MarginError::InsufficientInput { .. } | MarginError::EmptyResult { .. } => 3,
            MarginError::DegenerateFit { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
