use std::sync::Arc;

use crate::pipe::config::CoreConfig;
use crate::pipe::execute::inorder_execute;
use crate::pipe::instruction::{InstrKind, Instruction, RegId, NUM_SOURCES, REG_NONE};
use crate::pipe::state::CoreState;
use crate::pipe::window::WindowEntry;

/// A state with a 1-picosecond clock so times read as cycle numbers.
fn state_with_width(exec_width: u64) -> CoreState {
    let config = CoreConfig {
        exec_width,
        clock_period_ps: 1,
        show_heartbeat: false,
        ..CoreConfig::default()
    };
    CoreState::new(Arc::new(config))
}

fn ready_entry(seq: u64, ready_time: u64) -> WindowEntry {
    let mut instr = Instruction::independent(InstrKind::Alu);
    instr.seq = seq;
    let mut entry = WindowEntry::new(instr);
    entry.scheduled = true;
    entry.ready_time = ready_time;
    entry
}

fn executed_entry(seq: u64) -> WindowEntry {
    let mut entry = ready_entry(seq, 0);
    entry.executed = true;
    entry.completion_time = Some(0);
    entry
}

fn executed_seqs(state: &CoreState) -> Vec<u64> {
    state
        .window
        .iter()
        .filter(|e| e.executed)
        .map(|e| e.instr.seq)
        .collect()
}

#[test]
fn empty_window_makes_no_progress() {
    let mut state = state_with_width(2);
    assert_eq!(inorder_execute(&mut state), 0);
}

#[test]
fn unscheduled_head_blocks_everything_behind_it() {
    let mut state = state_with_width(4);
    state.current_time = 10;
    let mut head = ready_entry(1, 0);
    head.scheduled = false;
    state.window.push(head);
    state.window.push(ready_entry(2, 0));
    state.window.push(ready_entry(3, 0));

    assert_eq!(inorder_execute(&mut state), 0);
    assert!(executed_seqs(&state).is_empty(), "barrier was skipped");
}

#[test]
fn future_ready_time_blocks_everything_behind_it() {
    let mut state = state_with_width(4);
    state.current_time = 3;
    state.window.push(ready_entry(1, 5));
    state.window.push(ready_entry(2, 3));

    assert_eq!(inorder_execute(&mut state), 0);
    assert!(executed_seqs(&state).is_empty());
}

#[test]
fn invalid_source_register_blocks_everything_behind_it() {
    let mut state = state_with_width(4);
    state.current_time = 10;
    state.regs.invalidate(5);

    let mut sources = [REG_NONE; NUM_SOURCES];
    sources[0] = 5 as RegId;
    let mut instr = Instruction::new(InstrKind::Alu, sources, &[]);
    instr.seq = 1;
    let mut blocked = WindowEntry::new(instr);
    blocked.scheduled = true;
    state.window.push(blocked);
    state.window.push(ready_entry(2, 0));

    assert_eq!(inorder_execute(&mut state), 0);
    assert!(executed_seqs(&state).is_empty());

    // The producer completes; the same scan now fires both entries.
    state.regs.validate(5);
    assert_eq!(inorder_execute(&mut state), 2);
    assert_eq!(executed_seqs(&state), vec![1, 2]);
}

#[test]
fn progress_never_exceeds_execute_width() {
    let mut state = state_with_width(2);
    state.current_time = 10;
    for seq in 1..=5 {
        state.window.push(ready_entry(seq, 0));
    }

    assert_eq!(inorder_execute(&mut state), 2);
    assert_eq!(executed_seqs(&state), vec![1, 2]);
}

#[test]
fn executed_entries_are_transparent() {
    let mut state = state_with_width(2);
    state.current_time = 10;
    state.window.push(executed_entry(1));
    state.window.push(executed_entry(2));
    state.window.push(ready_entry(3, 0));
    state.window.push(ready_entry(4, 0));

    // Already-executed entries neither block nor consume bandwidth.
    assert_eq!(inorder_execute(&mut state), 2);
    assert_eq!(executed_seqs(&state), vec![1, 2, 3, 4]);
}

#[test]
fn executed_run_is_a_contiguous_prefix() {
    let mut state = state_with_width(4);
    state.current_time = 10;
    state.window.push(ready_entry(1, 0));
    state.window.push(ready_entry(2, 0));
    state.window.push(ready_entry(3, 99)); // not ready yet
    state.window.push(ready_entry(4, 0));

    assert_eq!(inorder_execute(&mut state), 2);
    assert_eq!(executed_seqs(&state), vec![1, 2], "skip-ahead is forbidden");
}

#[test]
fn reference_scenario_two_cycles() {
    // window = [e0 ready at 5, e1 ready at 3, e2 ready at 3], width 2.
    let mut state = state_with_width(2);
    state.window.push(ready_entry(1, 5));
    state.window.push(ready_entry(2, 3));
    state.window.push(ready_entry(3, 3));

    // At t=3 the head blocks everything.
    state.current_time = 3;
    assert_eq!(inorder_execute(&mut state), 0);

    // At t=5 the head unblocks; width allows exactly two.
    state.current_time = 5;
    assert_eq!(inorder_execute(&mut state), 2);
    assert_eq!(executed_seqs(&state), vec![1, 2]);

    // The deferred third entry goes the next cycle.
    state.current_time = 6;
    assert_eq!(inorder_execute(&mut state), 1);
    assert_eq!(executed_seqs(&state), vec![1, 2, 3]);
}

#[test]
fn memory_op_enters_lsq_with_open_completion() {
    let mut state = state_with_width(2);
    state.current_time = 10;
    let mut instr = Instruction::independent(InstrKind::Load);
    instr.seq = 1;
    let mut entry = WindowEntry::new(instr);
    entry.scheduled = true;
    state.window.push(entry);

    assert_eq!(inorder_execute(&mut state), 1);
    let entry = state.window.front().unwrap();
    assert!(entry.executed);
    assert_eq!(entry.completion_time, None, "completion waits on memory");
    assert_eq!(state.lsq.occupancy(), 1);
}

#[test]
fn full_lsq_charges_retry_latency() {
    let mut state = state_with_width(2);
    state.current_time = 10;
    for seq in 100..100 + state.config.lsq_size as u64 {
        assert!(state.lsq.push(seq, 1000));
    }

    let mut instr = Instruction::independent(InstrKind::Store);
    instr.seq = 1;
    let mut entry = WindowEntry::new(instr);
    entry.scheduled = true;
    state.window.push(entry);

    assert_eq!(inorder_execute(&mut state), 1);
    let entry = state.window.front().unwrap();
    let expected = 10 + state.config.lsq_retry_latency;
    assert_eq!(entry.completion_time, Some(expected));
}
