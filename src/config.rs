use crate::error::{Error, Result};

/// Parameters of a dehazing run
///
/// `radius` is used both as the side of the depth minimum filter and as the
/// guided filter radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DehazeParams {
    pub radius: u32,
    /// Scattering coefficient of the atmosphere
    pub beta: f32,
    /// Guided filter regularisation
    pub epsilon: f32,
    /// Whether `run` also writes the unfiltered and filtered depth maps
    pub save_intermediates: bool,
}

impl Default for DehazeParams {
    fn default() -> Self {
        Self {
            radius: 9,
            beta: 1.0,
            epsilon: 1e-5,
            save_intermediates: true,
        }
    }
}

impl DehazeParams {
    #[must_use]
    pub const fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub const fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub const fn with_save_intermediates(mut self, save_intermediates: bool) -> Self {
        self.save_intermediates = save_intermediates;
        self
    }

    /// Checks every parameter before any work is done.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - zero radius, negative or non-finite beta,
    ///   or an epsilon that is not a positive number
    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(Error::InvalidParameter(
                "radius must be positive".to_string(),
            ));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "beta must be a non-negative number, got {}",
                self.beta
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_command_line_defaults() {
        let params = DehazeParams::default();
        assert_eq!(params.radius, 9);
        assert_eq!(params.beta, 1.0);
        assert_eq!(params.epsilon, 1e-5);
        assert!(params.save_intermediates);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let params = DehazeParams::default()
            .with_radius(3)
            .with_beta(0.5)
            .with_epsilon(1e-3)
            .with_save_intermediates(false);
        assert_eq!(
            params,
            DehazeParams {
                radius: 3,
                beta: 0.5,
                epsilon: 1e-3,
                save_intermediates: false,
            }
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = DehazeParams::default();
        for params in [
            base.with_radius(0),
            base.with_beta(-0.1),
            base.with_beta(f32::NAN),
            base.with_epsilon(0.0),
            base.with_epsilon(f32::INFINITY),
        ] {
            assert!(matches!(
                params.validate(),
                Err(Error::InvalidParameter(_))
            ));
        }
        assert!(base.with_beta(0.0).validate().is_ok());
    }
}
