//! Errors raised by network construction, propagation and evaluation.

/// Errors that can occur while building or driving a network
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Input or expected-output length differs from the group it targets
    ShapeMismatch { expected: usize, found: usize },
    /// Propagation attempted on a group that has no predecessor
    NotWired { group: usize },
    /// A group was wired a second time
    AlreadyWired { group: usize },
    /// `evaluate` was given no samples
    EmptyDataset,
    /// A group with zero units, or a network with zero groups
    DegenerateTopology(String),
    /// Activation label outside the supported set
    UnknownActivation(String),
    /// Mutation budget is NaN or infinite
    InvalidRate(f64),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {} values, found {}", expected, found)
            }
            Self::NotWired { group } => write!(f, "Group {} is not wired to a predecessor", group),
            Self::AlreadyWired { group } => write!(f, "Group {} is already wired", group),
            Self::EmptyDataset => write!(f, "Cannot evaluate against an empty dataset"),
            Self::DegenerateTopology(msg) => write!(f, "Degenerate topology: {}", msg),
            Self::UnknownActivation(label) => write!(f, "Unknown activation function: {}", label),
            Self::InvalidRate(rate) => write!(f, "Invalid mutation rate: {}", rate),
        }
    }
}

impl std::error::Error for NetworkError {}
