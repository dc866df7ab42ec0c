use smallvec::SmallVec;

/// Simulated time, in picoseconds. Cycles are derived from this via the
/// configured clock period.
pub type Timestamp = u64;

pub type RegId = u8;

/// Hardwired always-valid register; an unused source slot holds this.
pub const REG_NONE: RegId = 0;

/// Fixed arity of the source register set of every instruction.
pub const NUM_SOURCES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrKind {
    Alu,
    Load,
    Store,
    Branch,
}

impl InstrKind {
    pub fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Program-order sequence number, assigned at initialization.
    pub seq: u64,
    pub kind: InstrKind,
    pub sources: [RegId; NUM_SOURCES],
    pub dests: SmallVec<[RegId; 2]>,
}

impl Instruction {
    pub fn new(kind: InstrKind, sources: [RegId; NUM_SOURCES], dests: &[RegId]) -> Self {
        Self {
            seq: 0,
            kind,
            sources,
            dests: SmallVec::from_slice(dests),
        }
    }

    /// Convenience constructor for an instruction with no register
    /// dependencies at all.
    pub fn independent(kind: InstrKind) -> Self {
        Self::new(kind, [REG_NONE; NUM_SOURCES], &[])
    }
}
