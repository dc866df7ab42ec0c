pub mod bandwidth;
pub mod config;
pub mod core;
pub mod execute;
pub mod heartbeat;
pub mod instruction;
pub mod lsq;
pub mod regfile;
pub mod stage;
pub mod state;
pub mod window;

mod unit_tests;

pub use bandwidth::Bandwidth;
pub use config::CoreConfig;
pub use self::core::Core;
pub use execute::{do_execution, inorder_execute};
pub use heartbeat::{Heartbeat, SystemClock, WallClock};
pub use instruction::{InstrKind, Instruction, RegId, Timestamp, NUM_SOURCES, REG_NONE};
pub use lsq::Lsq;
pub use regfile::RegisterAllocator;
pub use stage::{
    DecodeStage, FetchStage, InOrderExecuteStage, MemoryStage, PipelineStage, StageSet,
    WritebackStage,
};
pub use state::{CoreState, FrontendSlot};
pub use window::{Window, WindowEntry};
