// src/core/state.rs

use num_complex::Complex;
use std::fmt;

/// The joint quantum state of an n-qubit register before measurement.
///
/// Holds one complex amplitude per basis state; the vector length is 2^n.
/// Basis states are indexed by the n-bit integer whose bit `i` is the value
/// of logical qubit `i` (qubit 0 is the least-significant bit). The squared
/// norm of the vector stays within floating tolerance of 1.0 after every
/// gate application and between measurement steps; the engine and the
/// measurement unit are responsible for maintaining that invariant.
///
/// A state is exclusively owned by one simulation session and mutated in
/// place by gate application and measurement collapse.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct QuantumState {
    /// The amplitude vector, length 2^n for n qubits.
    state_vector: Vec<Complex<f64>>,
    /// Number of qubits the vector represents.
    num_qubits: usize,
}

impl QuantumState {
    /// Creates a state from a given amplitude vector.
    ///
    /// The caller guarantees `initial_vector.len() == 1 << num_qubits`;
    /// construction happens only inside the engine, which enforces it.
    pub(crate) fn new(initial_vector: Vec<Complex<f64>>, num_qubits: usize) -> Self {
        debug_assert_eq!(initial_vector.len(), 1usize << num_qubits);
        Self { state_vector: initial_vector, num_qubits }
    }

    /// Provides read-only access to the internal amplitude vector.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.state_vector
    }

    /// Provides mutable access for the engine and measurement unit.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.state_vector
    }

    /// Dimension of the state space, i.e. 2^n.
    pub fn dim(&self) -> usize {
        self.state_vector.len()
    }

    /// Number of qubits represented by this state.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of observing basis state `index`: |amplitude|².
    pub fn probability(&self, index: usize) -> f64 {
        self.state_vector[index].norm_sqr()
    }

    /// Sum of all basis-state probabilities. ≈ 1.0 for a valid state.
    pub fn total_probability(&self) -> f64 {
        self.state_vector.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Whether bit `qubit` is set in basis-state index `basis_index`.
    /// Qubit 0 is the least-significant bit.
    #[inline]
    pub fn qubit_bit(basis_index: usize, qubit: usize) -> bool {
        (basis_index >> qubit) & 1 == 1
    }

    /// Renders basis state `index` as a ket label, qubit 0 rightmost.
    pub fn basis_label(&self, index: usize) -> String {
        let mut label = String::with_capacity(self.num_qubits);
        for q in (0..self.num_qubits).rev() {
            label.push(if Self::qubit_bit(index, q) { '1' } else { '0' });
        }
        label
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QuantumState[{} qubits]", self.num_qubits)?;
        for (i, c) in self.state_vector.iter().enumerate() {
            // Skip negligible amplitudes to keep large registers readable.
            if c.norm_sqr() > 1e-12 {
                writeln!(f, "  |{}>: {:.4}", self.basis_label(i), c)?;
            }
        }
        Ok(())
    }
}

/// A resolved, definite measurement value for one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The qubit was observed in the ground state.
    Zero,
    /// The qubit was observed in the excited state.
    One,
}

impl Outcome {
    /// The outcome as a plain bit.
    pub fn bit(&self) -> u8 {
        match self {
            Outcome::Zero => 0,
            Outcome::One => 1,
        }
    }

    /// Builds an outcome from a basis-state bit.
    pub(crate) fn from_bit(bit: bool) -> Self {
        if bit { Outcome::One } else { Outcome::Zero }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}
