//! Configuration for the scheduling simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline workload factors and run parameters.
//! 2. **Structures:** Hierarchical config for the workload (`load`) and the
//!    run (`run`).
//! 3. **Validation:** Range checks matching the simulator's preconditions.
//!
//! Configuration is built from CLI flags or deserialized from JSON; use
//! `Config::default()` for a balanced medium-load run.

use serde::Deserialize;

use crate::common::constants::DEFAULT_SEED;
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Default CPU load factor.
    pub const CPU_LOAD: f64 = 0.5;

    /// Default I/O time factor.
    pub const IO_LOAD: f64 = 0.5;

    /// Default memory load.
    pub const MEM_LOAD: f64 = 0.5;

    /// Default number of processes in the measured phase.
    pub const PROCESSES: u64 = 1000;
}

/// Root configuration for a simulation run.
///
/// # Examples
///
/// Deserializing from JSON:
///
/// ```
/// use schedsim_core::config::Config;
///
/// let json = r#"{
///     "load": { "cpu": 0.5, "io": 0.5, "memory": 0.5 },
///     "run": { "processes": 200, "seed": 1579 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.run.processes, 200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Workload intensity factors.
    #[serde(default)]
    pub load: LoadConfig,
    /// Run length and reproducibility parameters.
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Checks that every load factor lies in the open interval (0, 1) and
    /// that the process count is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |v: f64| v > 0.0 && v < 1.0;
        if !in_range(self.load.cpu) {
            return Err(ConfigError::LoadOutOfRange {
                name: "cpu",
                value: self.load.cpu,
            });
        }
        if !in_range(self.load.io) {
            return Err(ConfigError::LoadOutOfRange {
                name: "io",
                value: self.load.io,
            });
        }
        if !in_range(self.load.memory) {
            return Err(ConfigError::LoadOutOfRange {
                name: "memory",
                value: self.load.memory,
            });
        }
        if self.run.processes == 0 {
            return Err(ConfigError::NonPositiveProcessCount(0));
        }
        Ok(())
    }
}

/// Workload intensity factors, each in the open interval (0, 1).
#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// CPU load factor. Arrival delays are divided by it, so higher values
    /// mean faster arrivals.
    #[serde(default = "LoadConfig::default_cpu")]
    pub cpu: f64,

    /// I/O time factor. Divided by the CPU factor before use, the quotient
    /// scales every I/O burst.
    #[serde(default = "LoadConfig::default_io")]
    pub io: f64,

    /// Memory load. Scales the range generated memory requests are drawn
    /// from.
    #[serde(default = "LoadConfig::default_memory")]
    pub memory: f64,
}

impl LoadConfig {
    /// Returns the default CPU load factor.
    fn default_cpu() -> f64 {
        defaults::CPU_LOAD
    }

    /// Returns the default I/O time factor.
    fn default_io() -> f64 {
        defaults::IO_LOAD
    }

    /// Returns the default memory load.
    fn default_memory() -> f64 {
        defaults::MEM_LOAD
    }

    /// The effective per-burst I/O scale: the raw I/O factor divided by the
    /// CPU load factor.
    pub fn io_time_factor(&self) -> f64 {
        self.io / self.cpu
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            cpu: defaults::CPU_LOAD,
            io: defaults::IO_LOAD,
            memory: defaults::MEM_LOAD,
        }
    }
}

/// Run length and reproducibility parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Number of processes to simulate in the measured phase. The driver
    /// clamps this to [5, 40960].
    #[serde(default = "RunConfig::default_processes")]
    pub processes: u64,

    /// PRNG seed. 0 selects the default seed (1579); identical seeds yield
    /// identical runs.
    #[serde(default = "RunConfig::default_seed")]
    pub seed: u64,
}

impl RunConfig {
    /// Returns the default process count.
    fn default_processes() -> u64 {
        defaults::PROCESSES
    }

    /// Returns the default PRNG seed.
    fn default_seed() -> u64 {
        DEFAULT_SEED
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            processes: defaults::PROCESSES,
            seed: DEFAULT_SEED,
        }
    }
}
