//! Network structure, wiring and forward propagation.

use super::activation::Activation;
use super::error::NetworkError;
use serde::{Deserialize, Serialize};

/// Weighted link to one unit of the preceding group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Position of the source unit in the predecessor group
    source: usize,
    weight: f64,
}

impl Connection {
    pub fn new(source: usize, weight: f64) -> Self {
        Self { source, weight }
    }

    #[inline]
    pub fn source(&self) -> usize {
        self.source
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub(crate) fn weight_mut(&mut self) -> &mut f64 {
        &mut self.weight
    }
}

/// A single computational unit: bias, activation function and incoming connections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    bias: f64,
    activation: f64,
    function: Activation,
    connections: Vec<Connection>,
}

impl Unit {
    /// Create an unconnected unit with zero bias
    pub fn new(function: Activation) -> Self {
        Self {
            bias: 0.0,
            activation: 0.0,
            function,
            connections: Vec::new(),
        }
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub(crate) fn bias_mut(&mut self) -> &mut f64 {
        &mut self.bias
    }

    /// Output of the last activation
    #[inline]
    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Set the output directly (input group only)
    pub fn set_activation(&mut self, value: f64) {
        self.activation = value;
    }

    #[inline]
    pub fn function(&self) -> Activation {
        self.function
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connection weights can be changed, the wiring itself cannot
    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    fn connect(&mut self, source: usize) {
        self.connections.push(Connection::new(source, 0.0));
    }

    /// Compute the activation from the predecessor group's outputs
    pub fn forward(&mut self, predecessor: &Group) -> Result<f64, NetworkError> {
        let mut sum = 0.0;
        for connection in &self.connections {
            let source = predecessor.units.get(connection.source).ok_or(
                NetworkError::ShapeMismatch {
                    expected: connection.source + 1,
                    found: predecessor.len(),
                },
            )?;
            sum += connection.weight * source.activation;
        }
        sum += self.bias;

        self.activation = self.function.apply(sum);
        Ok(self.activation)
    }
}

/// An ordered layer of units sharing one activation function.
///
/// Deserialization rejects empty groups, mixed activation functions, and
/// connections on a group that was never wired.
#[derive(Debug, Serialize, Deserialize)]
#[serde(try_from = "GroupRaw")]
pub struct Group {
    units: Vec<Unit>,
    function: Activation,
    /// Index of the predecessor within the owning network
    predecessor: Option<usize>,
    wired: bool,
}

impl Group {
    /// Create a group of `size` unwired units
    pub fn new(size: usize, function: Activation) -> Result<Self, NetworkError> {
        if size == 0 {
            return Err(NetworkError::DegenerateTopology(
                "group must contain at least one unit".to_string(),
            ));
        }

        Ok(Self {
            units: (0..size).map(|_| Unit::new(function)).collect(),
            function,
            predecessor: None,
            wired: false,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.function
    }

    #[inline]
    pub fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }

    #[inline]
    pub fn is_wired(&self) -> bool {
        self.wired
    }

    /// Current activations of every unit, in order
    pub fn outputs(&self) -> Vec<f64> {
        self.units.iter().map(|u| u.activation).collect()
    }

    /// Connect every unit to every unit of `predecessor`, given with its index.
    ///
    /// The input group is wired with `None` and gets no connections. A group
    /// can be wired only once.
    pub fn wire(&mut self, predecessor: Option<(usize, &Group)>) -> Result<(), NetworkError> {
        if self.wired {
            return Err(NetworkError::AlreadyWired {
                group: predecessor.map_or(0, |(index, _)| index + 1),
            });
        }

        if let Some((index, parent)) = predecessor {
            self.predecessor = Some(index);
            for unit in &mut self.units {
                for source in 0..parent.len() {
                    unit.connect(source);
                }
            }
        }
        self.wired = true;
        Ok(())
    }

    pub(crate) fn relink(&mut self, predecessor: Option<usize>) {
        self.predecessor = predecessor;
    }

    /// Set activations directly from input data
    pub fn activate_from_input(&mut self, data: &[f64]) -> Result<(), NetworkError> {
        if data.len() != self.units.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: self.units.len(),
                found: data.len(),
            });
        }

        for (unit, &value) in self.units.iter_mut().zip(data) {
            unit.set_activation(value);
        }
        Ok(())
    }

    /// Forward every unit from the predecessor.
    ///
    /// `earlier` holds the groups preceding this one in its network; the
    /// predecessor index is resolved against it.
    pub fn activate_from_predecessor(&mut self, earlier: &[Group]) -> Result<(), NetworkError> {
        let not_wired = NetworkError::NotWired {
            group: earlier.len(),
        };
        let predecessor = match self.predecessor {
            Some(index) => earlier.get(index).ok_or(not_wired)?,
            None => return Err(not_wired),
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.units
                .par_iter_mut()
                .try_for_each(|unit| unit.forward(predecessor).map(|_| ()))?;
        }

        #[cfg(not(feature = "parallel"))]
        {
            for unit in &mut self.units {
                unit.forward(predecessor)?;
            }
        }

        Ok(())
    }
}

impl Clone for Group {
    /// Deep copy of the units. The predecessor link is not copied; the owning
    /// network re-links its cloned groups.
    fn clone(&self) -> Self {
        Self {
            units: self.units.clone(),
            function: self.function,
            predecessor: None,
            wired: self.wired,
        }
    }
}

#[derive(Deserialize)]
struct GroupRaw {
    units: Vec<Unit>,
    function: Activation,
    predecessor: Option<usize>,
    wired: bool,
}

impl TryFrom<GroupRaw> for Group {
    type Error = NetworkError;

    fn try_from(raw: GroupRaw) -> Result<Self, Self::Error> {
        if raw.units.is_empty() {
            return Err(degenerate("group must contain at least one unit"));
        }
        if raw.units.iter().any(|u| u.function != raw.function) {
            return Err(degenerate("units must share the group's activation function"));
        }
        if !raw.wired
            && (raw.predecessor.is_some() || raw.units.iter().any(|u| !u.connections.is_empty()))
        {
            return Err(degenerate("unwired group has connections"));
        }

        Ok(Self {
            units: raw.units,
            function: raw.function,
            predecessor: raw.predecessor,
            wired: raw.wired,
        })
    }
}

fn degenerate(reason: &str) -> NetworkError {
    NetworkError::DegenerateTopology(reason.to_string())
}

/// A labeled record: network input and the output it should produce
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> Self {
        Self { input, expected }
    }
}

impl From<(Vec<f64>, Vec<f64>)> for Sample {
    fn from((input, expected): (Vec<f64>, Vec<f64>)) -> Self {
        Self::new(input, expected)
    }
}

/// Feed-forward network scored by half mean squared error.
///
/// Deserialization checks the wiring against the group order; the stored
/// error is taken as is.
#[derive(Debug, Serialize, Deserialize)]
#[serde(try_from = "NetworkRaw")]
pub struct Network {
    groups: Vec<Group>,
    /// Fitness of the last evaluation; lower is better
    error: f64,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Error value of a freshly reset network
    pub const RESET_ERROR: f64 = 1.0;

    /// Create an empty network
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            error: Self::RESET_ERROR,
        }
    }

    /// Build and wire a network from `(size, activation)` pairs, input group first
    pub fn with_topology(topology: &[(usize, Activation)]) -> Result<Self, NetworkError> {
        let mut network = Self::new();
        for &(size, activation) in topology {
            network.append(Group::new(size, activation)?);
        }
        network.wire_all()?;
        Ok(network)
    }

    /// Append a group. It stays inert until `wire_all` is called.
    pub fn append(&mut self, group: Group) -> &mut Self {
        self.groups.push(group);
        self
    }

    /// Wire each unwired group to its immediate predecessor
    pub fn wire_all(&mut self) -> Result<(), NetworkError> {
        for index in 0..self.groups.len() {
            if self.groups[index].is_wired() {
                continue;
            }
            let (earlier, rest) = self.groups.split_at_mut(index);
            let predecessor = earlier.last().map(|parent| (index - 1, parent));
            rest[0].wire(predecessor)?;
        }

        log::debug!(
            "Network wired: {} groups, {} parameters",
            self.groups.len(),
            self.parameter_count()
        );
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    /// Fitness of the last evaluation, or `RESET_ERROR`
    #[inline]
    pub fn error(&self) -> f64 {
        self.error
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    pub(crate) fn reset_error(&mut self) {
        self.error = Self::RESET_ERROR;
    }

    /// Number of input values `run` expects
    pub fn input_size(&self) -> usize {
        self.groups.first().map_or(0, Group::len)
    }

    /// Number of values `run` returns
    pub fn output_size(&self) -> usize {
        self.groups.last().map_or(0, Group::len)
    }

    /// Activations of the output group from the last run
    pub fn outputs(&self) -> Vec<f64> {
        self.groups.last().map(Group::outputs).unwrap_or_default()
    }

    /// Feed `input` forward and return the output group's activations
    pub fn run(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        let first = self.groups.first_mut().ok_or_else(|| {
            NetworkError::DegenerateTopology("network has no groups".to_string())
        })?;
        first.activate_from_input(input)?;

        for index in 1..self.groups.len() {
            let (earlier, rest) = self.groups.split_at_mut(index);
            rest[0].activate_from_predecessor(earlier)?;
        }

        Ok(self.outputs())
    }

    /// Score the network against `dataset` and store the result as its error.
    ///
    /// The error is the summed squared difference over every output of every
    /// sample, divided by twice the number of samples.
    pub fn evaluate(&mut self, dataset: &[Sample]) -> Result<f64, NetworkError> {
        if dataset.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }

        let mut sum = 0.0;
        for sample in dataset {
            let actual = self.run(&sample.input)?;
            if actual.len() != sample.expected.len() {
                return Err(NetworkError::ShapeMismatch {
                    expected: actual.len(),
                    found: sample.expected.len(),
                });
            }
            sum += sample
                .expected
                .iter()
                .zip(&actual)
                .map(|(expected, actual)| {
                    let diff = expected - actual;
                    diff * diff
                })
                .sum::<f64>();
        }

        self.error = sum / (2 * dataset.len()) as f64;
        log::debug!("Network evaluated: {} samples, error = {}", dataset.len(), self.error);
        Ok(self.error)
    }

    /// Get total number of parameters (weights + biases)
    pub fn parameter_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.units.iter())
            .map(|u| u.connections.len() + 1)
            .sum()
    }

    /// Check if network is valid (no NaN/Inf)
    pub fn is_valid(&self) -> bool {
        self.groups.iter().flat_map(|g| g.units.iter()).all(|u| {
            u.bias.is_finite() && u.connections.iter().all(|c| c.weight.is_finite())
        })
    }
}

impl Clone for Network {
    /// Independent deep copy. Every cloned group is re-linked to the previous
    /// clone; the error is not carried over.
    fn clone(&self) -> Self {
        let groups = self
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let mut copy = group.clone();
                copy.relink(group.predecessor.and(index.checked_sub(1)));
                copy
            })
            .collect();

        log::trace!("Network cloned: {} groups", self.groups.len());

        Self {
            groups,
            error: Self::RESET_ERROR,
        }
    }
}

#[derive(Deserialize)]
struct NetworkRaw {
    groups: Vec<Group>,
    error: f64,
}

impl TryFrom<NetworkRaw> for Network {
    type Error = NetworkError;

    fn try_from(raw: NetworkRaw) -> Result<Self, Self::Error> {
        for (index, group) in raw.groups.iter().enumerate() {
            let connected = group.units.iter().any(|u| !u.connections.is_empty());
            let Some(parent) = group.predecessor else {
                if connected {
                    return Err(NetworkError::NotWired { group: index });
                }
                continue;
            };

            if Some(parent) != index.checked_sub(1) {
                return Err(degenerate("predecessor must be the previous group"));
            }
            let size = raw.groups[parent].len();
            let full = group.units.iter().all(|u| {
                u.connections.len() == size
                    && u.connections.iter().enumerate().all(|(i, c)| c.source == i)
            });
            if !full {
                return Err(NetworkError::ShapeMismatch {
                    expected: size,
                    found: group.units.iter().map(|u| u.connections.len()).max().unwrap_or(0),
                });
            }
        }

        Ok(Self {
            groups: raw.groups,
            error: raw.error,
        })
    }
}
