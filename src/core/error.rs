//! Error handling logic

use std::fmt;

/// Error types covering every failure the simulation core can surface.
///
/// Validation failures (`InvalidArgument`, `CapacityExceeded`, `InvalidGate`)
/// are detected before any amplitude is mutated, so a caller receiving one of
/// them still holds an uncorrupted register. `DegenerateState` indicates an
/// internal invariant violation and is fatal for the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)] // Eq useful for testing error variants
pub enum SimError {
    /// A caller-supplied value is out of range or inconsistent: a zero-size
    /// register, a qubit index outside the register, malformed topology
    /// dimensions, or a session method invoked against its lifecycle order.
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// The requested register needs more amplitudes than the configured
    /// ceiling allows. The dense state vector grows as 2^n; the limit is
    /// explicit rather than a silent allocation failure.
    CapacityExceeded {
        /// Requested number of qubits
        requested: usize,
        /// Largest supported number of qubits
        maximum: usize,
    },

    /// A gate application is structurally invalid, e.g. a controlled gate
    /// whose control and target are the same qubit.
    InvalidGate {
        /// InvalidGate failure message
        message: String,
    },

    /// The state violated an internal invariant: surviving probability mass
    /// vanished during measurement collapse, or the norm drifted beyond
    /// tolerance. Indicates a logic bug, not a user error; the session must
    /// be discarded.
    DegenerateState {
        /// DegenerateState failure message
        message: String,
    },

    /// Wraps any other error with the evolution step and operation that
    /// produced it, for observability. No partial-state rollback is offered.
    Evolution {
        /// Evolution step (1-based) in which the failure occurred
        step: usize,
        /// Description of the failing operation
        operation: String,
        /// The underlying failure
        source: Box<SimError>,
    },
}

impl SimError {
    /// Convenience constructor for `InvalidArgument`.
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SimError::InvalidArgument { message: message.into() }
    }

    /// Wraps `self` with evolution-step context.
    pub(crate) fn in_step(self, step: usize, operation: impl Into<String>) -> Self {
        SimError::Evolution {
            step,
            operation: operation.into(),
            source: Box::new(self),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidArgument { message } => write!(f, "Invalid Argument: {}", message),
            SimError::CapacityExceeded { requested, maximum } => write!(
                f,
                "Capacity Exceeded: {} qubits requested, at most {} supported",
                requested, maximum
            ),
            SimError::InvalidGate { message } => write!(f, "Invalid Gate: {}", message),
            SimError::DegenerateState { message } => write!(f, "Degenerate State: {}", message),
            SimError::Evolution { step, operation, source } => {
                write!(f, "Evolution failed at step {} ({}): {}", step, operation, source)
            }
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Evolution { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
