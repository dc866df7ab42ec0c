use anyhow::bail;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::pipe::instruction::{InstrKind, Instruction, RegId, NUM_SOURCES, REG_NONE};
use crate::sim::config::Config;

/// Knobs for the synthetic instruction stream. Trace ingestion is out
/// of scope; this generator stands in for it with a deterministic,
/// seed-reproducible mix of ALU, memory, and branch work.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkloadConfig {
    pub num_instructions: u64,
    pub seed: u64,
    /// Percentages out of 100; the remainder is ALU work.
    pub load_pct: u32,
    pub store_pct: u32,
    pub branch_pct: u32,
    /// Chance (out of 100) that a given source slot carries a real
    /// register dependency rather than the hardwired-valid register.
    pub dep_pct: u32,
    pub num_regs: usize,
}

impl Config for WorkloadConfig {}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            num_instructions: 1_000_000,
            seed: 1,
            load_pct: 20,
            store_pct: 10,
            branch_pct: 15,
            dep_pct: 40,
            num_regs: 64,
        }
    }
}

impl WorkloadConfig {
    /// Reject values the generator cannot sample from: a register
    /// range narrower than `2..=256` (identifiers are u8 and register
    /// 0 is hardwired) or percentage knobs over 100.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(2..=256).contains(&self.num_regs) {
            bail!("workload config: num_regs must be within 2..=256, got {}", self.num_regs);
        }
        if self.load_pct + self.store_pct + self.branch_pct > 100 {
            bail!("workload config: load/store/branch percentages exceed 100");
        }
        if self.dep_pct > 100 {
            bail!("workload config: dep_pct must be at most 100");
        }
        Ok(())
    }
}

/// Per-core instruction stream generator.
pub struct Workload {
    config: WorkloadConfig,
    rng: StdRng,
    emitted: u64,
}

impl Workload {
    pub fn new(config: WorkloadConfig, core_id: usize) -> Self {
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(core_id as u64));
        Self {
            config,
            rng,
            emitted: 0,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.config.num_instructions - self.emitted
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn next_instruction(&mut self) -> Option<Instruction> {
        if self.is_exhausted() {
            return None;
        }
        self.emitted += 1;

        let kind = self.pick_kind();
        let sources = self.pick_sources();
        let dests = self.pick_dests(kind, &sources);
        Some(Instruction::new(kind, sources, &dests))
    }

    fn pick_kind(&mut self) -> InstrKind {
        let roll = self.rng.gen_range(0..100);
        let cfg = &self.config;
        if roll < cfg.load_pct {
            InstrKind::Load
        } else if roll < cfg.load_pct + cfg.store_pct {
            InstrKind::Store
        } else if roll < cfg.load_pct + cfg.store_pct + cfg.branch_pct {
            InstrKind::Branch
        } else {
            InstrKind::Alu
        }
    }

    fn pick_sources(&mut self) -> [RegId; NUM_SOURCES] {
        let mut sources = [REG_NONE; NUM_SOURCES];
        for slot in sources.iter_mut() {
            if self.rng.gen_range(0..100) < self.config.dep_pct {
                *slot = self.rng.gen_range(1..self.config.num_regs) as RegId;
            }
        }
        sources
    }

    /// Destinations never collide with this instruction's own sources:
    /// without renaming, an instruction reading its own pending
    /// destination would wait on itself forever.
    fn pick_dests(&mut self, kind: InstrKind, sources: &[RegId; NUM_SOURCES]) -> Vec<RegId> {
        let writes = match kind {
            InstrKind::Store | InstrKind::Branch => false,
            InstrKind::Alu | InstrKind::Load => true,
        };
        if !writes {
            return Vec::new();
        }
        loop {
            let dest = self.rng.gen_range(1..self.config.num_regs) as RegId;
            if !sources.contains(&dest) {
                return vec![dest];
            }
        }
    }
}
