//! Problem instances: nodes, distances and the parameters of a run.

use crate::benchmark::BenchmarkReference;
use crate::error::{AcoError, AcoResult};
use crate::params::AcoParams;
use serde::{Deserialize, Serialize};

/// A node of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position in the distance matrix, `0..N`
    pub idx: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    pub fn new(idx: usize, x: f64, y: f64) -> Self {
        Self { idx, x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// Dense N×N symmetric distance matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dimension: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Euclidean distances between every pair of `nodes`.
    ///
    /// Fails with `DataFormat` when two nodes are too far apart for their
    /// distance to be represented.
    pub fn euclidean(nodes: &[Node]) -> AcoResult<Self> {
        let n = nodes.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in i + 1..n {
                let d = nodes[i].distance_to(&nodes[j]);
                if !d.is_finite() {
                    return Err(AcoError::data_format(
                        None,
                        format!("distance between nodes {i} and {j} overflows"),
                    ));
                }
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Ok(Self { dimension: n, data })
    }

    /// Build from explicit rows.
    ///
    /// Rows must form a square, symmetric matrix of finite, non-negative
    /// values with a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AcoResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AcoError::DimensionMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(AcoError::invalid(format!(
                        "distance[{i}][{j}] must be finite and non-negative, got {d}"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(AcoError::invalid(format!(
                        "distance[{i}][{i}] must be 0, got {d}"
                    )));
                }
            }
            data.extend_from_slice(row);
        }
        for i in 0..n {
            for j in i + 1..n {
                if data[i * n + j] != data[j * n + i] {
                    return Err(AcoError::invalid(format!(
                        "distance matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { dimension: n, data })
    }

    /// Upper bound on any tour length: each node leaves along its longest
    /// edge.
    pub fn longest_tour_bound(&self) -> f64 {
        (0..self.dimension)
            .map(|i| self.row(i).iter().copied().fold(0.0, f64::max))
            .sum()
    }

    /// Number of nodes the matrix covers.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dimension + j]
    }

    /// Distances from `i` to every node.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }
}

/// Static description of one TSP instance plus the parameters it is solved
/// with. Immutable once built; the colony only borrows it.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    name: String,
    nodes: Vec<Node>,
    distances: DistanceMatrix,
    params: AcoParams,
    best_known_length: f64,
}

impl ProblemInstance {
    /// Build an instance from raw `(x, y)` coordinates.
    pub fn new(coords: &[(f64, f64)], params: AcoParams) -> AcoResult<Self> {
        let nodes = coords
            .iter()
            .enumerate()
            .map(|(idx, &(x, y))| Node::new(idx, x, y))
            .collect();
        Self::from_nodes(nodes, params)
    }

    /// Build an instance from loaded nodes, computing Euclidean distances.
    pub fn from_nodes(nodes: Vec<Node>, params: AcoParams) -> AcoResult<Self> {
        check_nodes(&nodes)?;
        let distances = DistanceMatrix::euclidean(&nodes)?;
        Self::with_distances(nodes, distances, params)
    }

    /// Build an instance from nodes and a precomputed distance matrix.
    pub fn with_distances(
        nodes: Vec<Node>,
        distances: DistanceMatrix,
        params: AcoParams,
    ) -> AcoResult<Self> {
        check_nodes(&nodes)?;
        if nodes.len() != distances.dimension() {
            return Err(AcoError::DimensionMismatch {
                expected: nodes.len(),
                actual: distances.dimension(),
            });
        }
        if !distances.longest_tour_bound().is_finite() {
            return Err(AcoError::data_format(
                None,
                "distances are too large for tour lengths to stay finite",
            ));
        }
        params.validate()?;
        Ok(Self {
            name: String::from("unnamed"),
            nodes,
            distances,
            params,
            best_known_length: 0.0,
        })
    }

    /// Set the instance name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Look up the best known length for this instance's name.
    ///
    /// Unknown names leave the `0.0` sentinel in place.
    #[must_use]
    pub fn with_reference(mut self, reference: &BenchmarkReference) -> Self {
        self.best_known_length = reference.best_known(&self.name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn params(&self) -> &AcoParams {
        &self.params
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Best known tour length, `0.0` when unknown.
    pub fn best_known_length(&self) -> f64 {
        self.best_known_length
    }

    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances.get(i, j)
    }

    /// Confirm that `requested` nodes are addressable by the distance matrix.
    pub fn check_node_count(&self, requested: usize) -> AcoResult<()> {
        if requested == self.distances.dimension() {
            Ok(())
        } else {
            Err(AcoError::DimensionMismatch {
                expected: requested,
                actual: self.distances.dimension(),
            })
        }
    }

    /// Length of `route`, including the edge from its last entry back to its
    /// first. A closed route's closing edge is a zero-length self loop, so
    /// open and closed forms of a cycle measure the same. An empty route has
    /// length `0`.
    pub fn tour_length(&self, route: &[usize]) -> AcoResult<f64> {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return Ok(0.0);
        };
        let n = self.num_nodes();
        if let Some(&bad) = route.iter().find(|&&idx| idx >= n) {
            return Err(AcoError::invalid(format!(
                "route visits node {bad}, instance has {n} nodes"
            )));
        }
        let open: f64 = route.windows(2).map(|w| self.distance(w[0], w[1])).sum();
        Ok(open + self.distance(last, first))
    }
}

fn check_nodes(nodes: &[Node]) -> AcoResult<()> {
    if nodes.is_empty() {
        return Err(AcoError::invalid("an instance needs at least one node"));
    }
    for (pos, node) in nodes.iter().enumerate() {
        if !node.x.is_finite() || !node.y.is_finite() {
            return Err(AcoError::data_format(
                None,
                format!("node {} has non-finite coordinates ({}, {})", node.idx, node.x, node.y),
            ));
        }
        if node.idx != pos {
            return Err(AcoError::data_format(
                None,
                format!("node at position {pos} carries index {}", node.idx),
            ));
        }
    }
    Ok(())
}
