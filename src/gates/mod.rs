// src/gates/mod.rs

//! The closed set of unitary gates the simulator applies.
//!
//! The circuit family simulated by this crate is fixed (superposition
//! preparation, a GHZ entangling chain, per-step rotations, and
//! topology-driven controlled-NOT sweeps), so the gate set is a closed sum
//! type rather than an open plugin mechanism. Every constructor returns an
//! exact 2×2 unitary; rotations use the exact trigonometric half-angle
//! formulas so that unitarity holds to floating tolerance for any angle.
//!
//! Gate values are plain data with no interior state and are safe to share
//! or rebuild concurrently across independent simulation sessions.

use crate::core::Outcome;
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// A 2×2 complex matrix acting on a single qubit's amplitude pair.
pub type Unitary2 = [[Complex<f64>; 2]; 2];

/// A named single-qubit unitary, possibly parametrized by an angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// The Hadamard transform, (1/√2)[[1, 1], [1, -1]]. Self-inverse.
    Hadamard,
    /// The bit-flip (Pauli-X) matrix [[0, 1], [1, 0]].
    PauliX,
    /// Rotation about the X axis by the given angle.
    RotationX(f64),
    /// Rotation about the Y axis by the given angle.
    RotationY(f64),
    /// Rotation about the Z axis by the given angle.
    RotationZ(f64),
}

impl Gate {
    /// Builds the unitary matrix for this gate.
    pub fn matrix(&self) -> Unitary2 {
        let i = Complex::i();
        match self {
            Gate::Hadamard => {
                let h = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            Gate::PauliX => [
                [Complex::zero(), Complex::new(1.0, 0.0)],
                [Complex::new(1.0, 0.0), Complex::zero()],
            ],
            Gate::RotationX(theta) => {
                // Rx(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
                let half = theta / 2.0;
                let cos_h = Complex::new(half.cos(), 0.0);
                let sin_h = half.sin();
                [[cos_h, -i * sin_h], [-i * sin_h, cos_h]]
            }
            Gate::RotationY(theta) => {
                // Ry(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
                let half = theta / 2.0;
                let cos_h = Complex::new(half.cos(), 0.0);
                let sin_h = Complex::new(half.sin(), 0.0);
                [[cos_h, -sin_h], [sin_h, cos_h]]
            }
            Gate::RotationZ(theta) => {
                // Rz(θ) = diag(e^(-iθ/2), e^(iθ/2))
                let half = theta / 2.0;
                [
                    [Complex::new(half.cos(), -half.sin()), Complex::zero()],
                    [Complex::zero(), Complex::new(half.cos(), half.sin())],
                ]
            }
        }
    }

    /// Short symbol used when rendering gate sequences.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::Hadamard => "H",
            Gate::PauliX => "X",
            Gate::RotationX(_) => "Rx",
            Gate::RotationY(_) => "Ry",
            Gate::RotationZ(_) => "Rz",
        }
    }
}

/// A gate application bound to specific qubits of a register.
///
/// The engine dispatches on this tagged descriptor: a `Single` variant
/// updates the amplitude pairs differing at the target bit, a `Controlled`
/// variant applies the base unitary to the target only where the control
/// bit is 1. Descriptors are constructed per application and not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOp {
    /// Apply `gate` to the single qubit `target`.
    Single {
        /// The qubit whose amplitude pairs are transformed.
        target: usize,
        /// The unitary to apply.
        gate: Gate,
    },
    /// Apply `gate` to `target` wherever the `control` qubit reads 1,
    /// identity elsewhere.
    Controlled {
        /// The qubit conditioning the interaction.
        control: usize,
        /// The qubit potentially transformed.
        target: usize,
        /// The base unitary applied on the control-set subspace.
        gate: Gate,
    },
}

impl GateOp {
    /// Controlled-NOT shorthand: bit-flip on `target` conditioned on `control`.
    pub fn cnot(control: usize, target: usize) -> Self {
        GateOp::Controlled { control, target, gate: Gate::PauliX }
    }

    /// Returns the qubit indices this operation touches.
    pub fn involved_qubits(&self) -> Vec<usize> {
        match self {
            GateOp::Single { target, .. } => vec![*target],
            GateOp::Controlled { control, target, .. } => vec![*control, *target],
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateOp::Single { target, gate } => match gate {
                Gate::RotationX(theta) | Gate::RotationY(theta) | Gate::RotationZ(theta) => {
                    write!(f, "{}({:.4}) q{}", gate.symbol(), theta, target)
                }
                _ => write!(f, "{} q{}", gate.symbol(), target),
            },
            GateOp::Controlled { control, target, gate } => {
                write!(f, "C{} q{} -> q{}", gate.symbol(), control, target)
            }
        }
    }
}

/// Convenience alias used by reset logic: flips a qubit observed as `One`.
pub(crate) fn flip_if_one(qubit: usize, outcome: Outcome) -> Option<GateOp> {
    match outcome {
        Outcome::One => Some(GateOp::Single { target: qubit, gate: Gate::PauliX }),
        Outcome::Zero => None,
    }
}
