use anyhow::bail;
use serde::Deserialize;

use crate::pipe::instruction::Timestamp;
use crate::sim::config::Config;

/// Static shape of one core: per-stage widths, latencies (in cycles),
/// buffer capacities, clock period, heartbeat settings. Built once at
/// construction and never mutated afterwards.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CoreConfig {
    pub exec_width: u64,
    pub fetch_width: u64,
    pub decode_width: u64,
    pub dispatch_width: u64,
    pub schedule_width: u64,
    pub retire_width: u64,

    pub fetch_latency: u64,
    pub decode_latency: u64,
    pub dispatch_latency: u64,
    pub schedule_latency: u64,
    pub exec_latency: u64,
    pub memory_latency: u64,
    /// Completion latency charged to a memory access that finds the
    /// load/store queue full.
    pub lsq_retry_latency: u64,

    pub window_size: usize,
    pub lsq_size: usize,
    pub num_regs: usize,

    pub clock_period_ps: Timestamp,
    pub heartbeat_period: u64,
    pub show_heartbeat: bool,
}

impl Config for CoreConfig {}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            exec_width: 2,
            fetch_width: 4,
            decode_width: 4,
            dispatch_width: 4,
            schedule_width: 4,
            retire_width: 4,
            fetch_latency: 1,
            decode_latency: 1,
            dispatch_latency: 1,
            schedule_latency: 1,
            exec_latency: 1,
            memory_latency: 20,
            lsq_retry_latency: 4,
            window_size: 64,
            lsq_size: 16,
            num_regs: 64,
            clock_period_ps: 250, // 4 GHz
            heartbeat_period: 10_000_000,
            show_heartbeat: true,
        }
    }
}

impl CoreConfig {
    /// Convert a latency in cycles to simulated picoseconds.
    pub fn latency_ps(&self, cycles: u64) -> Timestamp {
        cycles * self.clock_period_ps
    }

    /// Reject unusable values at load time, before they can reach the
    /// cycle loop.
    pub fn validate(&self) -> anyhow::Result<()> {
        let widths = [
            ("exec_width", self.exec_width),
            ("fetch_width", self.fetch_width),
            ("decode_width", self.decode_width),
            ("dispatch_width", self.dispatch_width),
            ("schedule_width", self.schedule_width),
            ("retire_width", self.retire_width),
        ];
        for (name, width) in widths {
            if width == 0 {
                bail!("core config: {name} must be positive");
            }
        }
        if self.window_size == 0 {
            bail!("core config: window_size must be positive");
        }
        if self.lsq_size == 0 {
            bail!("core config: lsq_size must be positive");
        }
        // Register identifiers are u8, and register 0 is hardwired.
        if !(2..=256).contains(&self.num_regs) {
            bail!("core config: num_regs must be within 2..=256, got {}", self.num_regs);
        }
        if self.clock_period_ps == 0 {
            bail!("core config: clock_period_ps must be positive");
        }
        if self.heartbeat_period == 0 {
            bail!("core config: heartbeat_period must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_stage_width_rejected() {
        let config = CoreConfig {
            exec_width: 0,
            ..CoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exec_width"));

        let config = CoreConfig {
            retire_width: 0,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn degenerate_register_file_rejected() {
        for num_regs in [0, 1, 257] {
            let config = CoreConfig {
                num_regs,
                ..CoreConfig::default()
            };
            assert!(config.validate().is_err(), "num_regs {num_regs} accepted");
        }
    }

    #[test]
    fn zero_clock_period_rejected() {
        let config = CoreConfig {
            clock_period_ps: 0,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_window_or_lsq_rejected() {
        let config = CoreConfig {
            window_size: 0,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            lsq_size: 0,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
