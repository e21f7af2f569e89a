//! Search configuration and acceptance policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PdpError;
use crate::neighborhood::MoveFamily;

/// Rule deciding which neighbor the search moves to.
///
/// Serialized with an `algorithm` tag:
///
/// ```json
/// { "algorithm": "simulated-annealing", "initial_temperature": 1000.0, "final_temperature": 100.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum AcceptancePolicy {
    /// With probability `probability` move to the cheapest neighbor,
    /// otherwise to a uniformly random one.
    GreedyStochastic {
        /// Chance of taking the cheapest neighbor, in `[0, 1]`.
        #[serde(default = "default_probability")]
        probability: f64,
    },

    /// Metropolis acceptance with a temperature that falls linearly with
    /// the fraction of time remaining.
    SimulatedAnnealing {
        /// Temperature at the start of the run. Must be positive.
        #[serde(default = "default_initial_temperature")]
        initial_temperature: f64,
        /// Temperature at the deadline, in `(0, initial_temperature]`.
        #[serde(default = "default_final_temperature")]
        final_temperature: f64,
    },

    /// Greedy-stochastic acceptance that jumps back to a previously visited
    /// state once the best-ever cost has not improved for
    /// `stagnation_threshold` iterations.
    StochasticRestart {
        /// Chance of taking the cheapest neighbor, in `[0, 1]`.
        #[serde(default = "default_probability")]
        probability: f64,
        /// Iterations without a new best-ever solution before jumping.
        #[serde(default = "default_stagnation_threshold")]
        stagnation_threshold: usize,
        /// Maximum number of stored restart states.
        #[serde(default = "default_reservoir_size")]
        reservoir_size: usize,
        /// Chance that an accepted, non-improving state is stored.
        #[serde(default = "default_reservoir_probability")]
        reservoir_probability: f64,
    },
}

fn default_probability() -> f64 {
    0.95
}

fn default_initial_temperature() -> f64 {
    1000.0
}

fn default_final_temperature() -> f64 {
    100.0
}

fn default_stagnation_threshold() -> usize {
    500
}

fn default_reservoir_size() -> usize {
    16
}

fn default_reservoir_probability() -> f64 {
    0.1
}

impl AcceptancePolicy {
    /// Greedy-stochastic policy with the given greedy probability.
    pub fn greedy_stochastic(probability: f64) -> Self {
        AcceptancePolicy::GreedyStochastic { probability }
    }

    /// Simulated annealing from `initial_temperature` down to
    /// `final_temperature`.
    pub fn simulated_annealing(initial_temperature: f64, final_temperature: f64) -> Self {
        AcceptancePolicy::SimulatedAnnealing {
            initial_temperature,
            final_temperature,
        }
    }

    /// Stochastic restart with default reservoir settings.
    pub fn stochastic_restart(probability: f64, stagnation_threshold: usize) -> Self {
        AcceptancePolicy::StochasticRestart {
            probability,
            stagnation_threshold,
            reservoir_size: default_reservoir_size(),
            reservoir_probability: default_reservoir_probability(),
        }
    }

    /// Kebab-case name used in serialized configurations and logs.
    pub fn name(&self) -> &'static str {
        match self {
            AcceptancePolicy::GreedyStochastic { .. } => "greedy-stochastic",
            AcceptancePolicy::SimulatedAnnealing { .. } => "simulated-annealing",
            AcceptancePolicy::StochasticRestart { .. } => "stochastic-restart",
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            AcceptancePolicy::GreedyStochastic { probability } => {
                check_probability("probability", probability)
            }
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                final_temperature,
            } => {
                if initial_temperature.is_nan() || initial_temperature <= 0.0 {
                    return Err(format!(
                        "initial_temperature must be positive, got {initial_temperature}"
                    ));
                }
                if final_temperature.is_nan() || final_temperature <= 0.0 {
                    return Err(format!(
                        "final_temperature must be positive, got {final_temperature}"
                    ));
                }
                if final_temperature > initial_temperature {
                    return Err("final_temperature must not exceed initial_temperature".into());
                }
                Ok(())
            }
            AcceptancePolicy::StochasticRestart {
                probability,
                stagnation_threshold,
                reservoir_size,
                reservoir_probability,
            } => {
                check_probability("probability", probability)?;
                check_probability("reservoir_probability", reservoir_probability)?;
                if stagnation_threshold == 0 {
                    return Err("stagnation_threshold must be at least 1".into());
                }
                if reservoir_size == 0 {
                    return Err("reservoir_size must be at least 1".into());
                }
                Ok(())
            }
        }
    }
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        AcceptancePolicy::simulated_annealing(
            default_initial_temperature(),
            default_final_temperature(),
        )
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be in [0, 1], got {value}"))
    }
}

/// Configuration for a time-boxed search run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pdp::search::{AcceptancePolicy, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_policy(AcceptancePolicy::greedy_stochastic(0.9))
///     .with_safety_margin(Duration::from_millis(10))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Acceptance rule.
    #[serde(flatten)]
    pub policy: AcceptancePolicy,

    /// Time reserved before the caller's deadline.
    #[serde(
        rename = "safety_margin_ms",
        with = "duration_millis",
        default = "default_safety_margin"
    )]
    pub safety_margin: Duration,

    /// Number of first-iteration durations reserved in addition to
    /// `safety_margin`.
    #[serde(default = "default_margin_iterations")]
    pub margin_iterations: u32,

    /// Seed for move selection. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Enabled move families.
    #[serde(default = "default_families")]
    pub families: Vec<MoveFamily>,
}

fn default_safety_margin() -> Duration {
    Duration::from_millis(5)
}

fn default_margin_iterations() -> u32 {
    3
}

fn default_families() -> Vec<MoveFamily> {
    MoveFamily::ALL.to_vec()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: AcceptancePolicy::default(),
            safety_margin: default_safety_margin(),
            margin_iterations: default_margin_iterations(),
            seed: None,
            families: default_families(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with the given policy and default settings.
    pub fn new(policy: AcceptancePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    pub fn with_margin_iterations(mut self, n: u32) -> Self {
        self.margin_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_families(mut self, families: Vec<MoveFamily>) -> Self {
        self.families = families;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PdpError> {
        self.policy.validate().map_err(PdpError::InvalidConfig)?;
        if self.families.is_empty() {
            return Err(PdpError::InvalidConfig(
                "at least one move family must be enabled".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, PdpError> {
        let config: SearchConfig =
            serde_json::from_str(json).map_err(|e| PdpError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
