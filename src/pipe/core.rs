use std::sync::Arc;

use crate::pipe::config::CoreConfig;
use crate::pipe::execute::inorder_execute;
use crate::pipe::heartbeat::{Heartbeat, SystemClock, WallClock};
use crate::pipe::instruction::Instruction;
use crate::pipe::stage::StageSet;
use crate::pipe::state::CoreState;

/// One simulated core: state, the five pipeline stages, and the
/// heartbeat monitor. Invoked once per discrete time step; returns the
/// summed progress of every stage so the outer scheduler can tell a
/// slow pipeline from a stuck one.
pub struct Core {
    pub id: usize,
    pub state: CoreState,
    stages: StageSet,
    heartbeat: Heartbeat,
}

impl Core {
    pub fn new(id: usize, config: Arc<CoreConfig>) -> Self {
        Self::with_stages(id, config, StageSet::inorder(), Box::new(SystemClock::new()))
    }

    /// Construct with a custom stage set and/or wall clock. This is the
    /// extensibility seam: replace exactly the stage slots you need,
    /// the cycle orchestration stays fixed.
    pub fn with_stages(
        id: usize,
        config: Arc<CoreConfig>,
        stages: StageSet,
        clock: Box<dyn WallClock>,
    ) -> Self {
        let heartbeat = Heartbeat::new(config.show_heartbeat, config.heartbeat_period, clock);
        Self {
            id,
            state: CoreState::new(config),
            stages,
            heartbeat,
        }
    }

    pub fn push_instruction(&mut self, instr: Instruction) {
        self.state.source.push_back(instr);
    }

    pub fn drained(&self) -> bool {
        self.state.drained()
    }

    pub fn retired(&self) -> u64 {
        self.state.num_retired
    }

    pub fn elapsed_cycles(&self) -> u64 {
        self.state.elapsed_cycles()
    }

    /// Stage-decomposed cycle: the five stages in reverse pipeline
    /// order, downstream before upstream, then the heartbeat.
    pub fn cycle(&mut self) -> u64 {
        self.state.current_time += self.state.config.clock_period_ps;

        let mut progress = 0;
        progress += self.stages.writeback.run(&mut self.state);
        progress += self.stages.execute.run(&mut self.state);
        progress += self.stages.memory.run(&mut self.state);
        progress += self.stages.decode.run(&mut self.state);
        progress += self.stages.fetch.run(&mut self.state);

        self.heartbeat.observe(self.id, &mut self.state);
        progress
    }

    /// Monolithic cycle: the same eleven operations inlined in the same
    /// order. Kept alongside the decomposed form as the reference
    /// formulation; the two are observably identical.
    pub fn cycle_monolithic(&mut self) -> u64 {
        self.state.current_time += self.state.config.clock_period_ps;

        let mut progress = 0;
        progress += self.state.retire_instructions();
        progress += self.state.complete_inflight();
        progress += inorder_execute(&mut self.state);
        progress += self.state.schedule_instructions();
        progress += self.state.handle_memory_return();
        progress += self.state.operate_lsq();

        progress += self.state.dispatch_instructions();
        progress += self.state.decode_instructions();
        progress += self.state.promote_to_decode();

        progress += self.state.fetch_instructions();
        progress += self.state.check_block_cache();
        self.state.initialize_instructions();

        self.heartbeat.observe(self.id, &mut self.state);
        progress
    }
}
