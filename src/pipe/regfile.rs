use crate::pipe::instruction::{RegId, REG_NONE};

/// Register validity oracle.
///
/// Tracks, per register identifier, how many in-flight instructions
/// still owe a write to it. A register is valid when no writer is
/// outstanding. Register 0 is hardwired valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAllocator {
    pending_writers: Vec<u32>,
}

impl RegisterAllocator {
    pub fn new(num_regs: usize) -> Self {
        Self {
            pending_writers: vec![0; num_regs],
        }
    }

    pub fn is_valid(&self, reg: RegId) -> bool {
        reg == REG_NONE || self.pending_writers[reg as usize] == 0
    }

    /// Called at dispatch for each destination register.
    pub fn invalidate(&mut self, reg: RegId) {
        if reg != REG_NONE {
            self.pending_writers[reg as usize] += 1;
        }
    }

    /// Called at completion for each destination register.
    pub fn validate(&mut self, reg: RegId) {
        if reg != REG_NONE {
            let count = &mut self.pending_writers[reg as usize];
            assert!(*count > 0, "register {reg} validated with no pending writer");
            *count -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RegisterAllocator;
    use crate::pipe::instruction::REG_NONE;

    #[test]
    fn register_zero_always_valid() {
        let regs = RegisterAllocator::new(32);
        assert!(regs.is_valid(REG_NONE));
    }

    #[test]
    fn pending_writer_invalidates() {
        let mut regs = RegisterAllocator::new(32);
        regs.invalidate(5);
        assert!(!regs.is_valid(5));
        regs.validate(5);
        assert!(regs.is_valid(5));
    }

    #[test]
    fn overlapping_writers_counted() {
        let mut regs = RegisterAllocator::new(32);
        regs.invalidate(7);
        regs.invalidate(7);
        regs.validate(7);
        assert!(!regs.is_valid(7), "second writer still outstanding");
        regs.validate(7);
        assert!(regs.is_valid(7));
    }
}
