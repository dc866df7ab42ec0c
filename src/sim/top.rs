use std::sync::Arc;

use anyhow::bail;
use log::{debug, info};

use crate::pipe::config::CoreConfig;
use crate::pipe::core::Core;
use crate::sim::config::SimConfig;
use crate::sim::stats::{CoreSummary, RunSummary};
use crate::sim::workload::{Workload, WorkloadConfig};

/// Depth to which each core's instruction source is kept topped up.
/// Deep enough that fetch never starves on feed granularity.
const FEED_DEPTH: usize = 32;

/// Top level: owns the cores and their workload streams, steps cycles,
/// and watches the summed per-cycle progress for liveness. A stall is a
/// zero progress count, not an error; only a sustained run of them is
/// treated as a deadlock.
pub struct Sim {
    cores: Vec<Core>,
    workloads: Vec<Workload>,
    sim_config: SimConfig,
}

impl Sim {
    pub fn new(
        sim_config: SimConfig,
        core_config: CoreConfig,
        workload_config: WorkloadConfig,
    ) -> Self {
        let core_config = Arc::new(core_config);
        let cores = (0..sim_config.num_cores)
            .map(|id| Core::new(id, Arc::clone(&core_config)))
            .collect();
        let workloads = (0..sim_config.num_cores)
            .map(|id| Workload::new(workload_config.clone(), id))
            .collect();
        Self {
            cores,
            workloads,
            sim_config,
        }
    }

    fn feed(&mut self) {
        for (core, workload) in self.cores.iter_mut().zip(&mut self.workloads) {
            while core.state.source.len() < FEED_DEPTH {
                match workload.next_instruction() {
                    Some(instr) => core.push_instruction(instr),
                    None => break,
                }
            }
        }
    }

    fn finished(&self) -> bool {
        self.workloads.iter().all(Workload::is_exhausted)
            && self.cores.iter().all(Core::drained)
    }

    pub fn run(&mut self) -> anyhow::Result<RunSummary> {
        let mut cycle: u64 = 0;
        let mut idle_cycles: u64 = 0;

        while !self.finished() {
            if cycle >= self.sim_config.timeout {
                bail!("timeout: {cycle} cycles elapsed without completing the workload");
            }

            self.feed();
            let progress: u64 = self.cores.iter_mut().map(Core::cycle).sum();
            cycle += 1;

            if progress == 0 {
                idle_cycles += 1;
                if idle_cycles >= self.sim_config.deadlock_cycle_limit {
                    bail!(
                        "deadlock: no forward progress for {idle_cycles} cycles at cycle {cycle}"
                    );
                }
            } else {
                idle_cycles = 0;
            }
        }
        debug!("all cores drained at cycle {cycle}");

        let per_core: Vec<CoreSummary> = self
            .cores
            .iter()
            .map(|core| CoreSummary::new(core.id, core.retired(), core.elapsed_cycles()))
            .collect();
        for core in &per_core {
            info!(
                "core {} retired {} instructions in {} cycles (IPC {:.4})",
                core.core, core.instructions, core.cycles, core.ipc
            );
        }
        Ok(RunSummary::new(per_core))
    }
}

#[cfg(test)]
mod tests {
    use super::Sim;
    use crate::pipe::config::CoreConfig;
    use crate::sim::config::SimConfig;
    use crate::sim::workload::WorkloadConfig;

    #[test]
    fn small_run_retires_everything() {
        let sim_config = SimConfig {
            num_cores: 2,
            timeout: 1_000_000,
            ..SimConfig::default()
        };
        let core_config = CoreConfig {
            show_heartbeat: false,
            ..CoreConfig::default()
        };
        let workload_config = WorkloadConfig {
            num_instructions: 500,
            ..WorkloadConfig::default()
        };

        let mut sim = Sim::new(sim_config, core_config, workload_config);
        let summary = sim.run().expect("run failed");
        assert_eq!(summary.total.instructions, 1000);
        assert!(summary.total.ipc > 0.0);
    }
}
