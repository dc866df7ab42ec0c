use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CoreSummary {
    pub core: usize,
    pub instructions: u64,
    pub cycles: u64,
    pub ipc: f64,
}

impl CoreSummary {
    pub fn new(core: usize, instructions: u64, cycles: u64) -> Self {
        let ipc = if cycles == 0 {
            0.0
        } else {
            instructions as f64 / cycles as f64
        };
        Self {
            core,
            instructions,
            cycles,
            ipc,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AggregateSummary {
    pub num_cores: usize,
    pub instructions: u64,
    pub cycles: u64,
    pub ipc: f64,
}

impl AddAssign<&CoreSummary> for AggregateSummary {
    fn add_assign(&mut self, core: &CoreSummary) {
        self.num_cores += 1;
        self.instructions = self.instructions.saturating_add(core.instructions);
        self.cycles = self.cycles.max(core.cycles);
        self.ipc = if self.cycles == 0 {
            0.0
        } else {
            self.instructions as f64 / self.cycles as f64
        };
    }
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub per_core: Vec<CoreSummary>,
    pub total: AggregateSummary,
}

impl RunSummary {
    pub fn new(per_core: Vec<CoreSummary>) -> Self {
        let mut total = AggregateSummary::default();
        for core in &per_core {
            total += core;
        }
        Self { per_core, total }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)
            .with_context(|| format!("cannot write stats to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreSummary, RunSummary};

    #[test]
    fn aggregate_uses_longest_core() {
        let summary = RunSummary::new(vec![
            CoreSummary::new(0, 1000, 500),
            CoreSummary::new(1, 1000, 1000),
        ]);
        assert_eq!(summary.total.instructions, 2000);
        assert_eq!(summary.total.cycles, 1000);
        assert!((summary.total.ipc - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_cycles_yield_zero_ipc() {
        let core = CoreSummary::new(0, 0, 0);
        assert_eq!(core.ipc, 0.0);
    }
}
