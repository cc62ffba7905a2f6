// src/topology/mod.rs

//! Interaction topologies defining which qubit pairs entangle.
//!
//! A topology maps each qubit index to an ordered neighbor sequence. The
//! order is part of the contract: controlled-NOT gates do not commute, so
//! the evolution loop walks neighbors exactly in the order returned here.

use crate::core::SimError;
use std::fmt;

/// Interaction topology for a qubit register.
///
/// Immutable once constructed; dimensions are validated against the register
/// size before any simulation state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Qubits on a cycle: each has a right and a left neighbor.
    Ring {
        /// Number of qubits on the ring; must equal the register size.
        size: usize,
    },
    /// Qubits on a 2D grid with periodic wraparound on both axes,
    /// indexed row-major.
    Torus {
        /// Grid width; `width * height` must equal the register size.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

impl Topology {
    /// Checks the topology dimensions against a register size.
    ///
    /// Ring requires at least two qubits (a single qubit has no distinct
    /// neighbor pair); Torus requires positive dimensions whose product is
    /// the register size.
    pub fn validate(&self, register_size: usize) -> Result<(), SimError> {
        match self {
            Topology::Ring { size } => {
                if *size < 2 {
                    return Err(SimError::invalid_argument(format!(
                        "ring topology needs at least 2 qubits, got {}",
                        size
                    )));
                }
                if *size != register_size {
                    return Err(SimError::invalid_argument(format!(
                        "ring size {} does not match register size {}",
                        size, register_size
                    )));
                }
                Ok(())
            }
            Topology::Torus { width, height } => {
                if *width < 1 || *height < 1 {
                    return Err(SimError::invalid_argument(format!(
                        "torus dimensions must be positive, got {}x{}",
                        width, height
                    )));
                }
                if width * height != register_size {
                    return Err(SimError::invalid_argument(format!(
                        "torus {}x{} covers {} qubits, register has {}",
                        width,
                        height,
                        width * height,
                        register_size
                    )));
                }
                Ok(())
            }
        }
    }

    /// Number of qubits this topology spans.
    pub fn size(&self) -> usize {
        match self {
            Topology::Ring { size } => *size,
            Topology::Torus { width, height } => width * height,
        }
    }

    /// Resolves the ordered neighbor sequence of one qubit.
    ///
    /// Ring: `[right, left]`, i.e. `[(i+1) mod n, (i-1+n) mod n]`.
    /// Torus: `[up, down, right, left]` on the row-major grid, wrapping on
    /// both axes. Pure function of the inputs.
    pub fn neighbors(&self, index: usize) -> Result<Vec<usize>, SimError> {
        let n = self.size();
        if index >= n {
            return Err(SimError::invalid_argument(format!(
                "qubit index {} out of range for topology of {} qubits",
                index, n
            )));
        }
        self.validate(n)?;
        match self {
            Topology::Ring { size } => {
                let n = *size;
                Ok(vec![(index + 1) % n, (index + n - 1) % n])
            }
            Topology::Torus { width, height } => {
                let (w, h) = (*width, *height);
                let row = index / w;
                let col = index % w;
                let up = ((row + h - 1) % h) * w + col;
                let down = ((row + 1) % h) * w + col;
                let right = row * w + (col + 1) % w;
                let left = row * w + (col + w - 1) % w;
                Ok(vec![up, down, right, left])
            }
        }
    }

    /// Resolves neighbor sequences for every qubit, ascending index.
    ///
    /// Recomputed on demand; callers wanting memoization hold the result.
    pub fn neighbor_map(&self) -> Result<Vec<Vec<usize>>, SimError> {
        (0..self.size()).map(|i| self.neighbors(i)).collect()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Ring { size } => write!(f, "ring({})", size),
            Topology::Torus { width, height } => write!(f, "torus({}x{})", width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_neighbors_are_right_then_left() {
        let topo = Topology::Ring { size: 4 };
        assert_eq!(topo.neighbors(0).unwrap(), vec![1, 3]);
        assert_eq!(topo.neighbors(2).unwrap(), vec![3, 1]);
    }

    #[test]
    fn ring_wraps_at_the_last_index() {
        let topo = Topology::Ring { size: 5 };
        assert_eq!(topo.neighbors(4).unwrap(), vec![0, 3]);
    }

    #[test]
    fn ring_of_one_is_rejected() {
        let topo = Topology::Ring { size: 1 };
        assert!(matches!(
            topo.neighbors(0),
            Err(SimError::InvalidArgument { .. })
        ));
        assert!(topo.validate(1).is_err());
    }

    #[test]
    fn two_by_two_torus_wraps_fully() {
        // On a 2x2 grid up and down coincide, as do right and left.
        let topo = Topology::Torus { width: 2, height: 2 };
        assert_eq!(topo.neighbors(0).unwrap(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn torus_neighbor_order_is_up_down_right_left() {
        // 3x3 grid, center qubit index 4 at (row 1, col 1).
        let topo = Topology::Torus { width: 3, height: 3 };
        assert_eq!(topo.neighbors(4).unwrap(), vec![1, 7, 5, 3]);
    }

    #[test]
    fn non_square_torus_resolves_row_major() {
        // 4x2 grid; index 5 sits at (row 1, col 1).
        let topo = Topology::Torus { width: 4, height: 2 };
        assert_eq!(topo.neighbors(5).unwrap(), vec![1, 1, 6, 4]);
    }

    #[test]
    fn torus_dimension_mismatch_is_rejected() {
        let topo = Topology::Torus { width: 3, height: 2 };
        assert!(topo.validate(5).is_err());
        assert!(topo.validate(6).is_ok());
    }

    #[test]
    fn zero_dimension_torus_is_rejected() {
        let topo = Topology::Torus { width: 0, height: 4 };
        assert!(topo.validate(0).is_err());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let topo = Topology::Ring { size: 3 };
        assert!(topo.neighbors(3).is_err());
    }

    #[test]
    fn neighbor_map_covers_every_qubit() {
        let topo = Topology::Torus { width: 2, height: 3 };
        let map = topo.neighbor_map().unwrap();
        assert_eq!(map.len(), 6);
        for neighbors in &map {
            assert_eq!(neighbors.len(), 4);
        }
    }
}
