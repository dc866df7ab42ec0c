use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::Value;

/// A TOML-backed configuration section. Sections are optional; a
/// missing section falls back to defaults with a warning.
pub trait Config: DeserializeOwned + Default {
    fn from_section(section: Option<&Value>) -> Self {
        match section {
            Some(value) => value.clone().try_into().expect("cannot deserialize config"),
            None => {
                warn!("config section not found, using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimConfig {
    pub num_cores: usize,
    /// Hard cap on simulated cycles.
    pub timeout: u64,
    /// Consecutive zero-progress cycles before the run is declared
    /// deadlocked.
    pub deadlock_cycle_limit: u64,
    pub stats_path: Option<String>,
}

impl Config for SimConfig {}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_cores: 1,
            timeout: 100_000_000,
            deadlock_cycle_limit: 10_000,
            stats_path: None,
        }
    }
}
