//! Capability interface used by an evolutionary driver.

use super::error::NetworkError;
use super::network::{Network, Sample};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Operations an evolutionary driver needs from a candidate.
///
/// `Clone` produces an independent deep copy whose error must be recomputed
/// with `evaluate` before it is compared.
pub trait Evolvable: Clone {
    /// Reinitialize every parameter and reset the error
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self;

    /// Perturb parameters in place, scaled by the current error
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), NetworkError>;

    /// Round every parameter to `digits` decimal places
    fn quantize(&mut self, digits: i32);

    /// Forward inference
    fn run(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError>;

    /// Score against `dataset`, store and return the error
    fn evaluate(&mut self, dataset: &[Sample]) -> Result<f64, NetworkError>;

    /// Error of the last evaluation; lower is better
    fn error(&self) -> f64;
}

impl Evolvable for Network {
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        Network::randomize(self, rng)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), NetworkError> {
        Network::mutate(self, rng)
    }

    fn quantize(&mut self, digits: i32) {
        Network::quantize(self, digits)
    }

    fn run(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        Network::run(self, input)
    }

    fn evaluate(&mut self, dataset: &[Sample]) -> Result<f64, NetworkError> {
        Network::evaluate(self, dataset)
    }

    fn error(&self) -> f64 {
        Network::error(self)
    }
}

/// Every network kind a driver can evolve
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Brain {
    /// Layered feed-forward network
    FeedForward(Network),
}

impl Brain {
    pub fn network(&self) -> &Network {
        match self {
            Brain::FeedForward(network) => network,
        }
    }
}

impl From<Network> for Brain {
    fn from(network: Network) -> Self {
        Brain::FeedForward(network)
    }
}

impl Evolvable for Brain {
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        match self {
            Brain::FeedForward(network) => {
                network.randomize(rng);
            }
        }
        self
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), NetworkError> {
        match self {
            Brain::FeedForward(network) => network.mutate(rng),
        }
    }

    fn quantize(&mut self, digits: i32) {
        match self {
            Brain::FeedForward(network) => network.quantize(digits),
        }
    }

    fn run(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        match self {
            Brain::FeedForward(network) => network.run(input),
        }
    }

    fn evaluate(&mut self, dataset: &[Sample]) -> Result<f64, NetworkError> {
        match self {
            Brain::FeedForward(network) => network.evaluate(dataset),
        }
    }

    fn error(&self) -> f64 {
        match self {
            Brain::FeedForward(network) => network.error(),
        }
    }
}
