//! # evolvenet
//!
//! Feed-forward networks evolved by random mutation instead of gradient descent.
//!
//! ## Features
//!
//! - **Self-adaptive**: a network's own error sets the size of its next mutation
//! - **Reproducible**: every random operation takes an injected, seedable generator
//! - **Independent**: networks are owned value trees; clones share nothing
//! - **Configurable**: YAML topology files
//!
//! ## Quick Start
//!
//! ```rust
//! use evolvenet::neural::{Activation, Network, Sample};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut network = Network::with_topology(&[
//!     (2, Activation::Identity),
//!     (3, Activation::Tanh),
//!     (1, Activation::Sigmoid),
//! ])
//! .unwrap();
//! network.randomize(&mut rng);
//!
//! let dataset = vec![
//!     Sample::new(vec![0.0, 1.0], vec![1.0]),
//!     Sample::new(vec![1.0, 1.0], vec![0.0]),
//! ];
//!
//! let mut child = network.clone();
//! child.evaluate(&dataset).unwrap();
//! child.mutate(&mut rng).unwrap();
//! let error = child.evaluate(&dataset).unwrap();
//! assert!(error.is_finite());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use evolvenet::Config;
//!
//! let mut config = Config::default();
//! config.seed = Some(7);
//! config.precision = Some(4);
//!
//! let network = config.build_random(&mut config.rng()).unwrap();
//! assert_eq!(network.input_size(), 2);
//! ```

pub mod config;
pub mod neural;

// Re-export main types
pub use config::Config;
pub use neural::{Evolvable, Network, NetworkError, Sample};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
