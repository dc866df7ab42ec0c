/// Per-cycle resource counter bounding how many instructions a stage may
/// advance. Constructed fresh at the top of each stage invocation and
/// discarded at the end of it.
#[derive(Debug, Clone, Copy)]
pub struct Bandwidth {
    width: u64,
    consumed: u64,
}

impl Bandwidth {
    pub fn new(width: u64) -> Self {
        assert!(width > 0, "stage width must be positive");
        Self { width, consumed: 0 }
    }

    pub fn has_remaining(&self) -> bool {
        self.consumed < self.width
    }

    /// Callers must check `has_remaining` first.
    pub fn consume(&mut self) {
        debug_assert!(self.has_remaining(), "bandwidth overdrawn");
        self.consumed += 1;
    }

    pub fn amount_consumed(&self) -> u64 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::Bandwidth;

    #[test]
    fn consume_up_to_width() {
        let mut bw = Bandwidth::new(3);
        assert_eq!(bw.amount_consumed(), 0);
        while bw.has_remaining() {
            bw.consume();
        }
        assert_eq!(bw.amount_consumed(), 3);
        assert!(!bw.has_remaining());
    }

    #[test]
    fn fresh_throttle_has_budget() {
        let bw = Bandwidth::new(1);
        assert!(bw.has_remaining());
    }

    #[test]
    #[should_panic(expected = "width must be positive")]
    fn zero_width_rejected() {
        let _ = Bandwidth::new(0);
    }
}
