// src/simulation/engine.rs

use crate::core::{MAX_QUBITS, QuantumState, SimError};
use crate::gates::{Gate, GateOp, Unitary2};
use num_complex::Complex;
use num_traits::Zero;

/// The state-vector engine: owns the amplitude vector of one register and
/// applies unitary gates to it.
///
/// Basis-state indexing follows the register contract: bit `i` of an index
/// is the value of logical qubit `i`. A single-qubit gate touches the
/// 2^(n-1) amplitude pairs differing only at the target bit; a controlled
/// gate touches the 2^(n-2) pairs whose control bit is set. Each pair is
/// read in full before either amplitude is written, so updates are
/// simultaneous rather than sequentially corrupting.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    /// The joint state of all qubits in the register.
    state: QuantumState,
    /// Number of qubits (N); the state vector has 2^N entries.
    num_qubits: usize,
}

impl SimulationEngine {
    /// Allocates the engine for an `num_qubits`-qubit register in the
    /// all-zero ground state: amplitude 1.0 at basis index 0.
    ///
    /// Fails with `InvalidArgument` for an empty register and with
    /// `CapacityExceeded` beyond [`MAX_QUBITS`]: the dense vector doubles
    /// per qubit, and the ceiling is enforced here rather than surfacing as
    /// an allocation failure mid-run.
    pub fn init(num_qubits: usize) -> Result<Self, SimError> {
        if num_qubits == 0 {
            return Err(SimError::invalid_argument(
                "cannot initialize an engine for zero qubits",
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(SimError::CapacityExceeded {
                requested: num_qubits,
                maximum: MAX_QUBITS,
            });
        }
        // MAX_QUBITS already bounds the shift well below usize::BITS; the
        // checked form keeps the guarantee independent of the constant.
        let dim = 1usize
            .checked_shl(num_qubits as u32)
            .ok_or(SimError::CapacityExceeded { requested: num_qubits, maximum: MAX_QUBITS })?;

        let mut initial_vec = vec![Complex::zero(); dim];
        initial_vec[0] = Complex::new(1.0, 0.0);

        Ok(Self {
            state: QuantumState::new(initial_vec, num_qubits),
            num_qubits,
        })
    }

    /// Read access to the current state.
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Mutable state access for the measurement unit.
    pub(crate) fn state_mut(&mut self) -> &mut QuantumState {
        &mut self.state
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    // Crate-visible state injection for tests.
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: QuantumState) -> Result<(), SimError> {
        if state.dim() != self.state.dim() {
            return Err(SimError::invalid_argument(format!(
                "cannot set state: dimension {} does not match engine dimension {}",
                state.dim(),
                self.state.dim()
            )));
        }
        self.state = state;
        Ok(())
    }

    /// Applies one gate descriptor to the state.
    pub fn apply(&mut self, op: &GateOp) -> Result<(), SimError> {
        match op {
            GateOp::Single { target, gate } => self.apply_single(*target, &gate.matrix()),
            GateOp::Controlled { control, target, gate } => {
                self.apply_controlled(*control, *target, &gate.matrix())
            }
        }
    }

    /// Applies a 2×2 unitary to the `target` qubit.
    ///
    /// Walks all basis-state pairs differing only at bit `target`: for each
    /// pair index `i` over the remaining n-1 bits, the partner indices are
    /// rebuilt by splitting `i` around the target bit.
    pub fn apply_single(&mut self, target: usize, matrix: &Unitary2) -> Result<(), SimError> {
        self.check_qubit(target)?;

        let mask = 1usize << target;
        let dim = self.state.dim();
        let vec = self.state.vector_mut();

        for i in 0..dim / 2 {
            // Insert a zero bit at the target position: bits of i at and
            // above `target` shift up one, lower bits stay.
            let i0 = ((i >> target) << (target + 1)) | (i & (mask - 1));
            let i1 = i0 | mask;

            let psi_0 = vec[i0]; // amplitude for |...target=0...>
            let psi_1 = vec[i1]; // amplitude for |...target=1...>

            vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
        Ok(())
    }

    /// Applies a 2×2 unitary to `target` on the subspace where `control`
    /// reads 1; identity elsewhere.
    ///
    /// Same pair walk as [`apply_single`](Self::apply_single), restricted to
    /// pairs whose control bit is set. The control bit is identical in both
    /// partners because the pair differs only at the target bit.
    pub fn apply_controlled(
        &mut self,
        control: usize,
        target: usize,
        matrix: &Unitary2,
    ) -> Result<(), SimError> {
        if control == target {
            return Err(SimError::InvalidGate {
                message: format!(
                    "control and target must be distinct qubits, both are {}",
                    control
                ),
            });
        }
        self.check_qubit(control)?;
        self.check_qubit(target)?;

        let target_mask = 1usize << target;
        let control_mask = 1usize << control;
        let dim = self.state.dim();
        let vec = self.state.vector_mut();

        for i in 0..dim / 2 {
            let i0 = ((i >> target) << (target + 1)) | (i & (target_mask - 1));
            if i0 & control_mask == 0 {
                continue;
            }
            let i1 = i0 | target_mask;

            let psi_0 = vec[i0];
            let psi_1 = vec[i1];

            vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
        Ok(())
    }

    /// Bit-flip convenience: `apply_single` with the Pauli-X matrix.
    pub fn apply_pauli_x(&mut self, target: usize) -> Result<(), SimError> {
        self.apply_single(target, &Gate::PauliX.matrix())
    }

    fn check_qubit(&self, index: usize) -> Result<(), SimError> {
        if index >= self.num_qubits {
            return Err(SimError::invalid_argument(format!(
                "qubit index {} out of range for a {}-qubit register",
                index, self.num_qubits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NORM_TOLERANCE;
    use std::f64::consts::FRAC_1_SQRT_2;

    /// Asserts that two complex state vectors are approximately equal
    /// component-wise.
    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        tolerance: f64,
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < tolerance * tolerance,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, DistSq: {:.3e}, Context: {}",
                i,
                actual[i],
                expected[i],
                dist_sq,
                context
            );
        }
    }

    #[test]
    fn init_allocates_the_ground_state() -> Result<(), SimError> {
        let engine = SimulationEngine::init(3)?;
        assert_eq!(engine.state().dim(), 8);
        assert_eq!(engine.state().probability(0), 1.0);
        assert!((engine.state().total_probability() - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn init_rejects_zero_qubits() {
        assert!(matches!(
            SimulationEngine::init(0),
            Err(SimError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn init_rejects_registers_beyond_the_ceiling() {
        match SimulationEngine::init(MAX_QUBITS + 1) {
            Err(SimError::CapacityExceeded { requested, maximum }) => {
                assert_eq!(requested, MAX_QUBITS + 1);
                assert_eq!(maximum, MAX_QUBITS);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn pauli_x_flips_the_addressed_qubit_only() -> Result<(), SimError> {
        // |000> --X(q1)--> |010>, basis index 2 under the bit-i convention.
        let mut engine = SimulationEngine::init(3)?;
        engine.apply_pauli_x(1)?;
        assert!((engine.state().probability(0b010) - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn hadamard_twice_restores_the_ground_state() -> Result<(), SimError> {
        let mut engine = SimulationEngine::init(1)?;
        let h = Gate::Hadamard.matrix();
        engine.apply_single(0, &h)?;
        engine.apply_single(0, &h)?;

        let expected = vec![Complex::new(1.0, 0.0), Complex::zero()];
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &expected,
            NORM_TOLERANCE,
            "H applied twice to |0>",
        );
        Ok(())
    }

    #[test]
    fn single_gate_on_highest_qubit_pairs_correctly() -> Result<(), SimError> {
        // Flip the top qubit of a 2-qubit register holding |01>; pairs at
        // the highest bit exercise the index-splitting arithmetic.
        let mut engine = SimulationEngine::init(2)?;
        engine.apply_pauli_x(0)?; // |01>, index 1
        engine.apply_pauli_x(1)?; // |11>, index 3
        assert!((engine.state().probability(0b11) - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn cnot_truth_table_on_basis_states() -> Result<(), SimError> {
        // |00> stays put: control is 0.
        let mut engine = SimulationEngine::init(2)?;
        engine.apply(&GateOp::cnot(0, 1))?;
        assert!((engine.state().probability(0b00) - 1.0).abs() < NORM_TOLERANCE);

        // |01> (control q0 = 1) flips the target: -> |11>.
        let mut engine = SimulationEngine::init(2)?;
        engine.apply_pauli_x(0)?;
        engine.apply(&GateOp::cnot(0, 1))?;
        assert!((engine.state().probability(0b11) - 1.0).abs() < NORM_TOLERANCE);

        // And back: a second CNOT undoes the flip.
        engine.apply(&GateOp::cnot(0, 1))?;
        assert!((engine.state().probability(0b01) - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn controlled_gate_rejects_equal_indices() -> Result<(), SimError> {
        let mut engine = SimulationEngine::init(2)?;
        let result = engine.apply(&GateOp::cnot(1, 1));
        assert!(matches!(result, Err(SimError::InvalidGate { .. })));
        // The state is untouched after the rejected application.
        assert!((engine.state().probability(0) - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn out_of_range_target_is_rejected_before_mutation() -> Result<(), SimError> {
        let mut engine = SimulationEngine::init(2)?;
        assert!(matches!(
            engine.apply_pauli_x(2),
            Err(SimError::InvalidArgument { .. })
        ));
        assert!((engine.state().probability(0) - 1.0).abs() < NORM_TOLERANCE);
        Ok(())
    }

    #[test]
    fn superposition_pair_update_is_simultaneous() -> Result<(), SimError> {
        // H on an equal superposition must interfere, not re-read partially
        // written amplitudes: (|0> + |1>)/sqrt(2) --H--> |0> exactly.
        let mut engine = SimulationEngine::init(1)?;
        engine.set_state(QuantumState::new(
            vec![
                Complex::new(FRAC_1_SQRT_2, 0.0),
                Complex::new(FRAC_1_SQRT_2, 0.0),
            ],
            1,
        ))?;
        engine.apply_single(0, &Gate::Hadamard.matrix())?;

        let expected = vec![Complex::new(1.0, 0.0), Complex::zero()];
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &expected,
            NORM_TOLERANCE,
            "H applied to |+>",
        );
        Ok(())
    }

    #[test]
    fn norm_is_preserved_across_a_mixed_gate_sequence() -> Result<(), SimError> {
        let mut engine = SimulationEngine::init(3)?;
        let ops = [
            GateOp::Single { target: 0, gate: Gate::Hadamard },
            GateOp::Single { target: 1, gate: Gate::RotationX(0.7) },
            GateOp::cnot(0, 2),
            GateOp::Single { target: 2, gate: Gate::RotationY(1.9) },
            GateOp::Single { target: 1, gate: Gate::RotationZ(-2.3) },
            GateOp::cnot(2, 1),
        ];
        for op in &ops {
            engine.apply(op)?;
            assert!(
                (engine.state().total_probability() - 1.0).abs() < NORM_TOLERANCE,
                "norm drifted after {}",
                op
            );
        }
        Ok(())
    }
}
