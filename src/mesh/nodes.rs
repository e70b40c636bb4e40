//! Node storage with number-to-offset resolution.

use std::collections::HashMap;

use nalgebra::Point3;

/// Nodes in parse order, addressable by the number written in the file.
///
/// A labelled node `N17` has number 17. An unlabelled node takes its 0-based
/// parse position as number, so files written without labels resolve
/// references as direct offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    points: Vec<Point3<f64>>,
    numbers: Vec<u64>,
    offsets: HashMap<u64, usize>,
}

impl NodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Returns `false` (and stores nothing) if `number` is
    /// already taken.
    pub fn push(&mut self, number: u64, point: Point3<f64>) -> bool {
        if self.offsets.contains_key(&number) {
            return false;
        }
        self.offsets.insert(number, self.points.len());
        self.points.push(point);
        self.numbers.push(number);
        true
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 0-based offset of the node carrying `number`.
    pub fn offset_of(&self, number: u64) -> Option<usize> {
        self.offsets.get(&number).copied()
    }

    /// Position of the node carrying `number`.
    pub fn resolve(&self, number: u64) -> Option<Point3<f64>> {
        self.offset_of(number).map(|i| self.points[i])
    }

    /// Node positions in parse order.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Node numbers in parse order.
    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }
}
