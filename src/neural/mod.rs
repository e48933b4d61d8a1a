//! Evolvable feed-forward networks.
//!
//! Implements the candidate side of an evolutionary strategy:
//! - Connections, units, groups and networks as owned value trees
//! - Wiring with index-based predecessor links
//! - Forward propagation and half-MSE fitness
//! - Randomization, fitness-scaled mutation and quantization

mod activation;
mod brain;
mod error;
mod mutations;
mod network;

pub use activation::Activation;
pub use brain::{Brain, Evolvable};
pub use error::NetworkError;
pub use network::{Connection, Group, Network, Sample, Unit};
