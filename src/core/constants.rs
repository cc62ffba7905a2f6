//! Numerical limits and tolerances shared across the simulation core.

/// Largest supported register size, in qubits.
///
/// The dense state vector holds 2^n complex amplitudes (16 bytes each);
/// at 26 qubits that is already 1 GiB. Registers beyond this ceiling are
/// rejected at initialization with `CapacityExceeded` instead of failing
/// somewhere inside an allocation.
pub const MAX_QUBITS: usize = 26;

/// Allowed deviation of the squared state norm from 1.0.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Threshold below which a probability mass is treated as zero.
pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
