use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;

use crate::pipe::bandwidth::Bandwidth;
use crate::pipe::config::CoreConfig;
use crate::pipe::instruction::{Instruction, Timestamp};
use crate::pipe::lsq::Lsq;
use crate::pipe::regfile::RegisterAllocator;
use crate::pipe::window::{Window, WindowEntry};

/// A fetched instruction moving through the front end on its way to the
/// window. `ready_time` gates each hop; `dib_checked` records that the
/// decoded-block cache has been consulted (or forcibly bypassed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendSlot {
    pub instr: Instruction,
    pub ready_time: Timestamp,
    pub dib_checked: bool,
}

/// All mutable state of one simulated core. The eleven stage operations
/// of the cycle live here as methods; the in-order execute pass is in
/// `pipe::execute`. Every operation returns the number of instructions
/// it advanced, bounded by a fresh `Bandwidth` of its stage width.
#[derive(Debug, Clone)]
pub struct CoreState {
    pub config: Arc<CoreConfig>,
    pub current_time: Timestamp,

    /// Instruction source fed by the surrounding simulator; stands in
    /// for the trace reader / instruction cache, which are external.
    pub source: VecDeque<Instruction>,
    pub fetch_buffer: VecDeque<FrontendSlot>,
    pub decode_queue: VecDeque<FrontendSlot>,
    pub dispatch_queue: VecDeque<FrontendSlot>,

    pub window: Window,
    pub regs: RegisterAllocator,
    pub lsq: Lsq,

    next_seq: u64,

    // Lifetime counters, read by the heartbeat monitor.
    pub num_retired: u64,
    pub last_heartbeat_instr: u64,
    pub last_heartbeat_time: Timestamp,
    pub begin_phase_instr: u64,
    pub begin_phase_time: Timestamp,
}

impl CoreState {
    pub fn new(config: Arc<CoreConfig>) -> Self {
        Self {
            current_time: 0,
            source: VecDeque::new(),
            fetch_buffer: VecDeque::new(),
            decode_queue: VecDeque::new(),
            dispatch_queue: VecDeque::new(),
            window: Window::new(config.window_size),
            regs: RegisterAllocator::new(config.num_regs),
            lsq: Lsq::new(config.lsq_size),
            next_seq: 1,
            num_retired: 0,
            last_heartbeat_instr: 0,
            last_heartbeat_time: 0,
            begin_phase_instr: 0,
            begin_phase_time: 0,
            config,
        }
    }

    pub fn elapsed_cycles(&self) -> u64 {
        self.current_time / self.config.clock_period_ps
    }

    /// Everything in flight or waiting has drained.
    pub fn drained(&self) -> bool {
        self.source.is_empty()
            && self.fetch_buffer.is_empty()
            && self.decode_queue.is_empty()
            && self.dispatch_queue.is_empty()
            && self.window.is_empty()
    }

    // --- writeback ---

    /// Pop completed entries from the window head, in order. The first
    /// non-completed entry stops the drain.
    pub fn retire_instructions(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.retire_width);
        while bw.has_remaining() && self.window.front().is_some_and(|e| e.completed) {
            let entry = self.window.pop_front().unwrap();
            debug!("retire seq {}", entry.instr.seq);
            self.num_retired += 1;
            bw.consume();
        }
        bw.amount_consumed()
    }

    /// Executed entries whose completion time has passed become
    /// completed; their destination registers turn valid.
    pub fn complete_inflight(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.exec_width);
        let now = self.current_time;
        let regs = &mut self.regs;
        for entry in self.window.iter_mut() {
            if !bw.has_remaining() {
                break;
            }
            if entry.executed && !entry.completed {
                if let Some(t) = entry.completion_time {
                    if t <= now {
                        entry.completed = true;
                        for &dest in &entry.instr.dests {
                            regs.validate(dest);
                        }
                        bw.consume();
                    }
                }
            }
        }
        bw.amount_consumed()
    }

    // --- execute (scheduling half; the issue half is pipe::execute) ---

    /// Mark window entries eligible for timing-model execution once
    /// their scheduling latency has been charged.
    pub fn schedule_instructions(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.schedule_width);
        let ready_time = self.current_time + self.config.latency_ps(self.config.schedule_latency);
        for entry in self.window.iter_mut() {
            if !bw.has_remaining() {
                break;
            }
            if !entry.scheduled {
                entry.scheduled = true;
                entry.ready_time = ready_time;
                bw.consume();
            }
        }
        bw.amount_consumed()
    }

    // --- memory ---

    /// Drain completed memory accesses: the owning window entries get
    /// their completion time stamped to now.
    pub fn handle_memory_return(&mut self) -> u64 {
        let mut progress = 0;
        let now = self.current_time;
        while let Some(seq) = self.lsq.pop_completed() {
            if let Some(entry) = self.window.find_mut(seq) {
                debug_assert!(entry.executed, "memory return for unexecuted seq {seq}");
                entry.completion_time = Some(now);
                progress += 1;
            }
        }
        progress
    }

    pub fn operate_lsq(&mut self) -> u64 {
        self.lsq.operate(self.current_time)
    }

    // --- decode ---

    /// Admit decoded instructions into the window; destination
    /// registers become invalid until completion.
    pub fn dispatch_instructions(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.dispatch_width);
        let now = self.current_time;
        while bw.has_remaining()
            && !self.window.is_full()
            && self.dispatch_queue.front().is_some_and(|s| s.ready_time <= now)
        {
            let slot = self.dispatch_queue.pop_front().unwrap();
            for &dest in &slot.instr.dests {
                self.regs.invalidate(dest);
            }
            self.window.push(WindowEntry::new(slot.instr));
            bw.consume();
        }
        bw.amount_consumed()
    }

    pub fn decode_instructions(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.decode_width);
        let now = self.current_time;
        let dispatch_at = now + self.config.latency_ps(self.config.dispatch_latency);
        while bw.has_remaining() && self.decode_queue.front().is_some_and(|s| s.ready_time <= now) {
            let mut slot = self.decode_queue.pop_front().unwrap();
            slot.ready_time = dispatch_at;
            self.dispatch_queue.push_back(slot);
            bw.consume();
        }
        bw.amount_consumed()
    }

    pub fn promote_to_decode(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.decode_width);
        let now = self.current_time;
        let decode_at = now + self.config.latency_ps(self.config.decode_latency);
        while bw.has_remaining()
            && self
                .fetch_buffer
                .front()
                .is_some_and(|s| s.dib_checked && s.ready_time <= now)
        {
            let mut slot = self.fetch_buffer.pop_front().unwrap();
            slot.ready_time = decode_at;
            self.decode_queue.push_back(slot);
            bw.consume();
        }
        bw.amount_consumed()
    }

    // --- fetch ---

    pub fn fetch_instructions(&mut self) -> u64 {
        let mut bw = Bandwidth::new(self.config.fetch_width);
        let fetch_done = self.current_time + self.config.latency_ps(self.config.fetch_latency);
        while bw.has_remaining() {
            match self.source.pop_front() {
                Some(instr) => {
                    self.fetch_buffer.push_back(FrontendSlot {
                        instr,
                        ready_time: fetch_done,
                        dib_checked: false,
                    });
                    bw.consume();
                }
                None => break,
            }
        }
        bw.amount_consumed()
    }

    /// The in-order front end never uses the decoded-block fast path:
    /// every unchecked slot is marked checked and thereby routed to the
    /// memory-side instruction source. Shared by both sequencer forms.
    pub fn check_block_cache(&mut self) -> u64 {
        let mut marked = 0;
        for slot in self.fetch_buffer.iter_mut() {
            if !slot.dib_checked {
                slot.dib_checked = true;
                marked += 1;
            }
        }
        marked
    }

    /// Assign program-order sequence numbers to freshly fetched
    /// instructions. Side effect only; contributes no progress count.
    pub fn initialize_instructions(&mut self) {
        for slot in self.fetch_buffer.iter_mut() {
            if slot.instr.seq == 0 {
                slot.instr.seq = self.next_seq;
                self.next_seq += 1;
            }
        }
    }
}
