// src/simulation/session.rs

use crate::core::{NORM_TOLERANCE, QuantumState, SimError};
use crate::gates::{Gate, GateOp, flip_if_one};
use crate::simulation::engine::SimulationEngine;
use crate::simulation::measurement;
use crate::simulation::results::MeasurementOutcomes;
use crate::topology::Topology;
use crate::validation::check_normalization;
use rand::rngs::StdRng;
use std::f64::consts::PI;

/// Lifecycle phase of a simulation session.
///
/// Phases only advance; a method invoked against the order fails with
/// `InvalidArgument` before touching the state. Skipping forward is legal;
/// entangling an unprepared register, for instance, is how a textbook GHZ
/// state is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionPhase {
    /// Register allocated in the ground state, no gates applied yet.
    Allocated,
    /// Uniform superposition prepared across all qubits.
    Prepared,
    /// GHZ entangling chain applied.
    Entangled,
    /// One or more interaction/entanglement steps applied.
    Evolving,
    /// Outcomes sampled and the state collapsed accordingly.
    Measured,
    /// Measured qubits restored to the ground state; terminal.
    Released,
}

/// One register's simulation lifecycle: owns the state-vector engine, the
/// interaction topology, and the session's random generator.
///
/// The session drives the fixed circuit family in order: superposition
/// preparation, GHZ chain, per-step interaction rotations interleaved with
/// topology-driven cluster entanglement, measurement, reset. Gate order is
/// deterministic throughout (ascending qubit index, then the topology's
/// fixed neighbor order); the random generator is consulted only by
/// measurement.
///
/// `evolve_step` is public so an embedding host can interleave its own
/// cancellation checks between steps of a long evolution.
pub struct SimulationSession {
    engine: SimulationEngine,
    topology: Topology,
    /// Neighbor sequences per qubit, resolved once at construction.
    neighbor_map: Vec<Vec<usize>>,
    rng: StdRng,
    phase: SessionPhase,
    last_outcomes: Option<MeasurementOutcomes>,
}

impl SimulationSession {
    /// Allocates a session for `register_size` qubits under `topology`.
    ///
    /// The topology is validated against the register size, and the full
    /// neighbor map resolved, before the state vector is allocated; a
    /// failing request leaves nothing behind.
    pub fn new(
        register_size: usize,
        topology: Topology,
        rng: StdRng,
    ) -> Result<Self, SimError> {
        if register_size == 0 {
            return Err(SimError::invalid_argument(
                "register size must be at least 1",
            ));
        }
        topology.validate(register_size)?;
        let neighbor_map = topology.neighbor_map()?;
        let engine = SimulationEngine::init(register_size)?;

        Ok(Self {
            engine,
            topology,
            neighbor_map,
            rng,
            phase: SessionPhase::Allocated,
            last_outcomes: None,
        })
    }

    /// The session's current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The interaction topology this session entangles under.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Read access to the current joint state.
    pub fn state(&self) -> &QuantumState {
        self.engine.state()
    }

    /// Number of qubits in the register.
    pub fn register_size(&self) -> usize {
        self.engine.num_qubits()
    }

    /// Applies Hadamard to every qubit, ascending index, producing the
    /// uniform superposition. Transition: Allocated → Prepared.
    pub fn prepare(&mut self) -> Result<(), SimError> {
        self.ensure_before(SessionPhase::Prepared, "prepare")?;
        for qubit in 0..self.register_size() {
            self.engine.apply(&GateOp::Single { target: qubit, gate: Gate::Hadamard })?;
        }
        self.phase = SessionPhase::Prepared;
        Ok(())
    }

    /// Applies the GHZ entangling chain: Hadamard on qubit 0, then a chain
    /// of controlled-NOTs from each qubit to its successor.
    /// Transition: (Allocated | Prepared) → Entangled.
    ///
    /// The Hadamard on qubit 0 is unconditional, so run directly after
    /// `prepare` the two Hadamards on that qubit cancel. Entangling a
    /// freshly allocated register instead yields the textbook GHZ state.
    pub fn entangle_ghz(&mut self) -> Result<(), SimError> {
        self.ensure_before(SessionPhase::Entangled, "entangle_ghz")?;
        self.engine.apply(&GateOp::Single { target: 0, gate: Gate::Hadamard })?;
        for qubit in 1..self.register_size() {
            self.engine.apply(&GateOp::cnot(qubit - 1, qubit))?;
        }
        self.phase = SessionPhase::Entangled;
        Ok(())
    }

    /// Runs evolution steps t = 1..=steps. Transition: → Evolving.
    pub fn evolve(&mut self, steps: usize) -> Result<(), SimError> {
        for t in 1..=steps {
            self.evolve_step(t)?;
        }
        Ok(())
    }

    /// Runs a single evolution step `t` (1-based).
    ///
    /// Two sweeps, both in ascending qubit order:
    /// 1. interaction rotations: with `angle = 2π·t/10`, each qubit `idx`
    ///    receives RotationX(angle·(idx+1)/n), RotationY(angle/2),
    ///    RotationZ(angle/3), in that order;
    /// 2. cluster entanglement: CNOT from each qubit to every one of its
    ///    neighbors, in the topology's fixed neighbor order.
    ///
    /// Any failure is wrapped with the step and operation context; the
    /// session offers no rollback and must be discarded on error.
    pub fn evolve_step(&mut self, t: usize) -> Result<(), SimError> {
        self.ensure_before(SessionPhase::Evolving, "evolve_step")
            .map_err(|e| e.in_step(t, "phase check"))?;
        self.phase = SessionPhase::Evolving;

        let n = self.register_size();
        let angle = 2.0 * PI * (t as f64) / 10.0;

        for idx in 0..n {
            let rotations = [
                GateOp::Single {
                    target: idx,
                    gate: Gate::RotationX(angle * (idx as f64 + 1.0) / n as f64),
                },
                GateOp::Single { target: idx, gate: Gate::RotationY(angle / 2.0) },
                GateOp::Single { target: idx, gate: Gate::RotationZ(angle / 3.0) },
            ];
            for op in &rotations {
                self.engine
                    .apply(op)
                    .map_err(|e| e.in_step(t, op.to_string()))?;
            }
        }

        for idx in 0..n {
            // The neighbor map is resolved at construction; clone the row to
            // keep the engine borrow disjoint.
            let neighbors = self.neighbor_map[idx].clone();
            for nb in neighbors {
                let op = GateOp::cnot(idx, nb);
                self.engine
                    .apply(&op)
                    .map_err(|e| e.in_step(t, op.to_string()))?;
            }
        }

        check_normalization(self.engine.state(), Some(NORM_TOLERANCE))
            .map_err(|e| e.in_step(t, "normalization check"))?;
        Ok(())
    }

    /// Samples outcomes for the requested qubits and collapses the state.
    /// An empty slice measures every qubit in ascending index order.
    /// Transition: → Measured.
    ///
    /// Indices are validated in full before the first qubit is measured.
    pub fn measure(&mut self, indices: &[usize]) -> Result<MeasurementOutcomes, SimError> {
        self.ensure_before(SessionPhase::Measured, "measure")?;
        let n = self.register_size();
        for &index in indices {
            if index >= n {
                return Err(SimError::invalid_argument(format!(
                    "measure index {} out of range for a {}-qubit register",
                    index, n
                )));
            }
        }

        let resolved: Vec<usize> = if indices.is_empty() {
            (0..n).collect()
        } else {
            indices.to_vec()
        };

        let outcomes = measurement::measure(&mut self.engine, &resolved, &mut self.rng)?;
        self.last_outcomes = Some(outcomes.clone());
        self.phase = SessionPhase::Measured;
        Ok(outcomes)
    }

    /// Restores every qubit observed as 1 to the ground state via Pauli-X
    /// and releases the register. Transition: Measured → Released.
    ///
    /// Unmeasured qubits keep whatever superposition survived the collapse.
    pub fn reset(&mut self) -> Result<(), SimError> {
        if self.phase != SessionPhase::Measured {
            return Err(SimError::invalid_argument(format!(
                "reset requires a measured session, phase is {:?}",
                self.phase
            )));
        }
        let Some(outcomes) = self.last_outcomes.take() else {
            return Err(SimError::DegenerateState {
                message: "measured session has no recorded outcomes".to_string(),
            });
        };
        for &(qubit, outcome) in outcomes.records() {
            if let Some(op) = flip_if_one(qubit, outcome) {
                self.engine.apply(&op)?;
            }
        }
        self.phase = SessionPhase::Released;
        Ok(())
    }

    /// Rejects calls arriving after their lifecycle slot has passed.
    fn ensure_before(&self, next: SessionPhase, action: &str) -> Result<(), SimError> {
        if self.phase > next {
            return Err(SimError::invalid_argument(format!(
                "cannot {} in phase {:?}",
                action, self.phase
            )));
        }
        Ok(())
    }
}
