// src/simulation/mod.rs

//! Simulates the evolution and measurement of a qubit register.
//!
//! This module contains the `Simulator` entry point, the per-register
//! `SimulationSession` lifecycle, the internal state-vector engine, and the
//! Born-rule measurement unit.

pub(crate) mod engine;
pub(crate) mod measurement;
mod results;
mod session;

// Re-export the main public interface types
pub use engine::SimulationEngine;
pub use measurement::marginal_one_probability;
pub use results::MeasurementOutcomes;
pub use session::{SessionPhase, SimulationSession};

use crate::core::SimError;
use crate::topology::Topology;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Everything one simulation run needs: register size, evolution step
/// count, interaction topology, and the qubits to measure at the end.
///
/// An empty `measure_indices` means "measure all qubits, ascending".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    /// Number of qubits in the register; must be at least 1 (and at least 2
    /// for a ring topology).
    pub register_size: usize,
    /// Number of evolution steps to run; 0 skips evolution entirely.
    pub steps: usize,
    /// Interaction topology driving the cluster-entanglement sweeps.
    pub topology: Topology,
    /// Qubits to measure, in order; empty means all qubits ascending.
    pub measure_indices: Vec<usize>,
}

/// The main simulator orchestrating register lifecycles.
///
/// Randomness is the only source of non-determinism in the core, and each
/// run owns its generator: a seeded simulator reproduces outcomes exactly,
/// and independent simulators never contend on a shared source.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    /// When set, every run seeds its session generator from this value.
    seed: Option<u64>,
}

impl Simulator {
    /// Creates a simulator whose sessions draw from OS entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a deterministic simulator: every run reuses `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Runs one full register lifecycle and returns the measured outcomes.
    ///
    /// The sequence is fixed: uniform superposition, GHZ entangling chain,
    /// `steps` interaction/entanglement steps, measurement of the requested
    /// qubits, then reset of the measured qubits to the ground state.
    ///
    /// Every argument is validated before any state is allocated or
    /// mutated; a failed validation can never leak a partially evolved
    /// register.
    pub fn run(&self, request: &SimulationRequest) -> Result<MeasurementOutcomes, SimError> {
        if request.register_size == 0 {
            return Err(SimError::invalid_argument(
                "register size must be at least 1",
            ));
        }
        request.topology.validate(request.register_size)?;
        for &index in &request.measure_indices {
            if index >= request.register_size {
                return Err(SimError::invalid_argument(format!(
                    "measure index {} out of range for a {}-qubit register",
                    index, request.register_size
                )));
            }
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::try_from_rng(&mut rand::rngs::SysRng)
                .expect("unexpected failure from SysRng"),
        };

        let mut session = SimulationSession::new(request.register_size, request.topology, rng)?;
        session.prepare()?;
        session.entangle_ghz()?;
        session.evolve(request.steps)?;
        let outcomes = session.measure(&request.measure_indices)?;
        session.reset()?;
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NORM_TOLERANCE;

    fn ring_request(register_size: usize, steps: usize) -> SimulationRequest {
        SimulationRequest {
            register_size,
            steps,
            topology: Topology::Ring { size: register_size },
            measure_indices: Vec::new(),
        }
    }

    #[test]
    fn empty_measure_list_defaults_to_all_qubits_ascending() -> Result<(), SimError> {
        let outcomes = Simulator::with_seed(11).run(&ring_request(4, 0))?;
        let measured: Vec<usize> = outcomes.records().iter().map(|(q, _)| *q).collect();
        assert_eq!(measured, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn explicit_measure_list_preserves_request_order() -> Result<(), SimError> {
        let mut request = ring_request(4, 1);
        request.measure_indices = vec![3, 0];
        let outcomes = Simulator::with_seed(11).run(&request)?;
        let measured: Vec<usize> = outcomes.records().iter().map(|(q, _)| *q).collect();
        assert_eq!(measured, vec![3, 0]);
        Ok(())
    }

    #[test]
    fn out_of_range_measure_index_fails_validation() {
        let mut request = ring_request(3, 2);
        request.measure_indices = vec![1, 3];
        let result = Simulator::with_seed(0).run(&request);
        assert!(matches!(result, Err(SimError::InvalidArgument { .. })));
    }

    #[test]
    fn zero_size_register_fails_validation() {
        let request = SimulationRequest {
            register_size: 0,
            steps: 0,
            topology: Topology::Torus { width: 1, height: 1 },
            measure_indices: Vec::new(),
        };
        assert!(matches!(
            Simulator::new().run(&request),
            Err(SimError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn single_qubit_ring_fails_validation() {
        let request = ring_request(1, 0);
        assert!(matches!(
            Simulator::new().run(&request),
            Err(SimError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn seeded_runs_are_reproducible() -> Result<(), SimError> {
        let request = SimulationRequest {
            register_size: 6,
            steps: 3,
            topology: Topology::Torus { width: 3, height: 2 },
            measure_indices: Vec::new(),
        };
        let first = Simulator::with_seed(99).run(&request)?;
        let second = Simulator::with_seed(99).run(&request)?;
        assert_eq!(first, second, "same seed and request must reproduce outcomes");
        Ok(())
    }

    #[test]
    fn torus_evolution_keeps_the_state_normalized() -> Result<(), SimError> {
        let rng = StdRng::seed_from_u64(5);
        let topology = Topology::Torus { width: 2, height: 2 };
        let mut session = SimulationSession::new(4, topology, rng)?;
        session.prepare()?;
        session.entangle_ghz()?;
        session.evolve(4)?;
        assert!((session.state().total_probability() - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }
}
