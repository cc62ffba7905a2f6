// src/validation/mod.rs

//! State invariant checks shared by the engine, the session layer and tests.

use crate::core::{NORM_TOLERANCE, QuantumState, SimError};

/// Checks that the state vector is normalized: sum of squared amplitude
/// magnitudes ≈ 1.0.
///
/// Every gate in the closed set is unitary, so a drift beyond tolerance
/// indicates a logic bug rather than a recoverable condition; callers treat
/// the failure as fatal for the session.
///
/// # Arguments
/// * `state` - The state to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to [`NORM_TOLERANCE`].
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(SimError::DegenerateState)` otherwise.
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<(), SimError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.total_probability();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(SimError::DegenerateState {
            message: format!(
                "state normalization failed: sum(|c_i|^2) = {} (deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use num_traits::Zero;

    #[test]
    fn ground_state_passes() {
        let state = QuantumState::new(vec![Complex::new(1.0, 0.0), Complex::zero()], 1);
        assert!(check_normalization(&state, None).is_ok());
    }

    #[test]
    fn unnormalized_state_fails() {
        let state = QuantumState::new(
            vec![Complex::new(0.9, 0.0), Complex::new(0.1, 0.0)],
            1,
        );
        assert!(matches!(
            check_normalization(&state, None),
            Err(SimError::DegenerateState { .. })
        ));
    }

    #[test]
    fn tolerance_override_is_respected() {
        let state = QuantumState::new(
            vec![Complex::new(0.999, 0.0), Complex::zero()],
            1,
        );
        assert!(check_normalization(&state, Some(1e-9)).is_err());
        assert!(check_normalization(&state, Some(0.01)).is_ok());
    }
}
