use crate::pipe::execute::inorder_execute;
use crate::pipe::state::CoreState;

/// One of the five pipeline stages. A stage bundles its operations in
/// a fixed internal order and reports the number of instructions it
/// advanced. Whole-stage replacement is the only supported override
/// surface: a custom core swaps one boxed stage in the `StageSet`, the
/// orchestration around it stays untouched.
pub trait PipelineStage {
    fn name(&self) -> &'static str;
    fn run(&mut self, state: &mut CoreState) -> u64;
}

pub struct WritebackStage;

impl PipelineStage for WritebackStage {
    fn name(&self) -> &'static str {
        "writeback"
    }

    fn run(&mut self, state: &mut CoreState) -> u64 {
        state.retire_instructions() + state.complete_inflight()
    }
}

pub struct InOrderExecuteStage;

impl PipelineStage for InOrderExecuteStage {
    fn name(&self) -> &'static str {
        "execute"
    }

    fn run(&mut self, state: &mut CoreState) -> u64 {
        inorder_execute(state) + state.schedule_instructions()
    }
}

pub struct MemoryStage;

impl PipelineStage for MemoryStage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn run(&mut self, state: &mut CoreState) -> u64 {
        state.handle_memory_return() + state.operate_lsq()
    }
}

pub struct DecodeStage;

impl PipelineStage for DecodeStage {
    fn name(&self) -> &'static str {
        "decode"
    }

    fn run(&mut self, state: &mut CoreState) -> u64 {
        state.dispatch_instructions() + state.decode_instructions() + state.promote_to_decode()
    }
}

pub struct FetchStage;

impl PipelineStage for FetchStage {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn run(&mut self, state: &mut CoreState) -> u64 {
        let progress = state.fetch_instructions() + state.check_block_cache();
        state.initialize_instructions();
        progress
    }
}

/// The five stage slots of one core, selected at construction. Invoked
/// writeback-first so that no stage observes a mix of this-cycle and
/// last-cycle state for the same instruction.
pub struct StageSet {
    pub writeback: Box<dyn PipelineStage>,
    pub execute: Box<dyn PipelineStage>,
    pub memory: Box<dyn PipelineStage>,
    pub decode: Box<dyn PipelineStage>,
    pub fetch: Box<dyn PipelineStage>,
}

impl StageSet {
    pub fn inorder() -> Self {
        Self {
            writeback: Box::new(WritebackStage),
            execute: Box::new(InOrderExecuteStage),
            memory: Box::new(MemoryStage),
            decode: Box::new(DecodeStage),
            fetch: Box::new(FetchStage),
        }
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self::inorder()
    }
}
