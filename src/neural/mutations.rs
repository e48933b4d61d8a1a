//! Randomization, fitness-scaled mutation and quantization.
//!
//! A network's current error is its exploration budget: it is split evenly
//! across the units of each group, then each unit splits its share evenly
//! across its connections.

use super::error::NetworkError;
use super::network::{Connection, Group, Network, Unit};
use rand::Rng;

/// True when `[-rate, rate)` is a non-empty range whose width fits in an f64
#[inline]
fn is_usable_rate(rate: f64) -> bool {
    rate > 0.0 && (rate * 2.0).is_finite()
}

/// Uniform sample in `[-rate, rate)`; zero when the range is unusable
#[inline]
fn perturbation<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    if is_usable_rate(rate) {
        rng.gen_range(-rate..rate)
    } else {
        0.0
    }
}

/// Round to `digits` decimal places.
///
/// Past the f64 range the scale overflows or underflows: every finite value
/// is already exact at a huge positive precision and rounds to zero at a huge
/// negative one.
#[inline]
fn round_to(value: f64, digits: i32) -> f64 {
    let precision = 10f64.powi(digits);
    if precision == 0.0 {
        return 0.0;
    }
    let scaled = value * precision;
    if !precision.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / precision
}

impl Connection {
    /// Draw the weight uniformly from `[-1, 1)`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_weight(rng.gen_range(-1.0..1.0));
    }

    /// Shift the weight by a uniform sample in `[-rate, rate)`
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64) {
        *self.weight_mut() += perturbation(rng, rate);
    }

    pub fn quantize(&mut self, digits: i32) {
        self.set_weight(round_to(self.weight(), digits));
    }
}

impl Unit {
    /// Draw the bias and every weight uniformly from `[-1, 1)`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_bias(rng.gen_range(-1.0..1.0));
        for connection in self.connections_mut() {
            connection.randomize(rng);
        }
    }

    /// Perturb the bias by `rate` and each weight by `rate / connections`.
    ///
    /// Input units have no connections; only their bias moves.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64) {
        *self.bias_mut() += perturbation(rng, rate);

        let connections = self.connections_mut();
        if connections.is_empty() {
            return;
        }
        let connection_rate = rate / connections.len() as f64;
        for connection in connections {
            connection.mutate(rng, connection_rate);
        }
    }

    pub fn quantize(&mut self, digits: i32) {
        self.set_bias(round_to(self.bias(), digits));
        for connection in self.connections_mut() {
            connection.quantize(digits);
        }
    }
}

impl Group {
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for unit in self.units_mut() {
            unit.randomize(rng);
        }
    }

    /// Mutate every unit with `rate / units`
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64) {
        let units = self.units_mut();
        if units.is_empty() {
            return;
        }
        let unit_rate = rate / units.len() as f64;
        for unit in units {
            unit.mutate(rng, unit_rate);
        }
    }

    pub fn quantize(&mut self, digits: i32) {
        for unit in self.units_mut() {
            unit.quantize(digits);
        }
    }
}

impl Network {
    /// Reset the error to `RESET_ERROR` and draw every parameter from `[-1, 1)`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.reset_error();
        for group in self.groups_mut() {
            group.randomize(rng);
        }
        log::debug!("Network randomized: {} parameters", self.parameter_count());
        self
    }

    /// Perturb every parameter, using the current error as the budget.
    ///
    /// A zero error leaves the network unchanged. A negative, non-finite, or
    /// overflowing error is rejected before any parameter is touched.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), NetworkError> {
        let rate = self.error();
        if rate == 0.0 {
            log::debug!("Mutation skipped: error is zero");
            return Ok(());
        }
        if !is_usable_rate(rate) {
            return Err(NetworkError::InvalidRate(rate));
        }

        log::trace!("Mutating network: rate = {}", rate);
        for group in self.groups_mut() {
            group.mutate(rng, rate);
        }
        Ok(())
    }

    /// Round every bias and weight to `digits` decimal places
    pub fn quantize(&mut self, digits: i32) {
        log::trace!("Quantizing network: {} digits", digits);
        for group in self.groups_mut() {
            group.quantize(digits);
        }
    }
}
