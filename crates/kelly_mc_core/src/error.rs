use std::fmt;

/// Configuration rejected by the validator, carrying every problem found
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problems.as_slice() {
            [] => write!(f, "invalid configuration"),
            [only] => write!(f, "invalid configuration: {only}"),
            problems => write!(
                f,
                "invalid configuration ({} problems): {}",
                problems.len(),
                problems.join("; ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by fraction resolution and the Monte Carlo engine.
///
/// These signal programmer errors: input that should have been rejected by
/// [`crate::validation::validate`] before reaching the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Number of resolved fractions does not match the number of setups
    FractionCountMismatch { setups: usize, fractions: usize },
    /// A resolved fraction is NaN or infinite
    NonFiniteFraction { setup: usize, value: f64 },
    /// Per-setup fraction sources do not line up with the setups
    SourceCountMismatch { setups: usize, sources: usize },
    /// Trajectory rows have different lengths
    RaggedPaths { expected: usize, found: usize },
    /// An optimizer setting is outside its meaningful range
    InvalidSetting {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Any other violated engine precondition
    Precondition(&'static str),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::FractionCountMismatch { setups, fractions } => write!(
                f,
                "expected one fraction per setup ({setups} setups), got {fractions}"
            ),
            SimulationError::NonFiniteFraction { setup, value } => {
                write!(f, "fraction for setup {setup} is not finite ({value})")
            }
            SimulationError::SourceCountMismatch { setups, sources } => write!(
                f,
                "expected one fraction source per setup ({setups} setups), got {sources}"
            ),
            SimulationError::RaggedPaths { expected, found } => write!(
                f,
                "trajectory length mismatch: expected {expected} values, found {found}"
            ),
            SimulationError::InvalidSetting {
                name,
                value,
                reason,
            } => write!(f, "invalid Kelly setting {name}={value}: {reason}"),
            SimulationError::Precondition(msg) => write!(f, "precondition violated: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Errors raised when an ensemble cannot be reduced to statistics
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The ensemble holds no paths or no periods
    EmptyEnsemble,
    /// Stored wealth matrix does not match the declared shape
    ShapeMismatch { expected: usize, found: usize },
    /// Ensemble was produced with a different initial capital than the config
    CapitalMismatch { ensemble: f64, config: f64 },
    /// A policy setting is outside its meaningful range
    InvalidSetting {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::EmptyEnsemble => write!(f, "trajectory ensemble is empty"),
            AnalyticsError::ShapeMismatch { expected, found } => write!(
                f,
                "wealth matrix has {found} values, expected {expected}"
            ),
            AnalyticsError::CapitalMismatch { ensemble, config } => write!(
                f,
                "ensemble initial capital {ensemble} does not match configuration {config}"
            ),
            AnalyticsError::InvalidSetting {
                name,
                value,
                reason,
            } => write!(f, "invalid analytics setting {name}={value}: {reason}"),
        }
    }
}

impl std::error::Error for AnalyticsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let single = ValidationError {
            problems: vec!["Initial capital must be positive".into()],
        };
        assert_eq!(
            single.to_string(),
            "invalid configuration: Initial capital must be positive"
        );

        let many = ValidationError {
            problems: vec!["a".into(), "b".into()],
        };
        assert_eq!(many.to_string(), "invalid configuration (2 problems): a; b");
    }

    #[test]
    fn test_simulation_error_display() {
        let err = SimulationError::FractionCountMismatch {
            setups: 2,
            fractions: 1,
        };
        assert_eq!(
            err.to_string(),
            "expected one fraction per setup (2 setups), got 1"
        );
    }
}
