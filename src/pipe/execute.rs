use log::trace;

use crate::pipe::bandwidth::Bandwidth;
use crate::pipe::config::CoreConfig;
use crate::pipe::instruction::Timestamp;
use crate::pipe::lsq::Lsq;
use crate::pipe::state::CoreState;
use crate::pipe::window::WindowEntry;

/// In-order execution: fire only a leading, contiguous run of ready
/// instructions, oldest first, bounded by the execute width.
///
/// Already-executed entries are transparent: they neither block the
/// scan nor consume bandwidth. Any unexecuted entry that is not ready
/// (unscheduled, ahead of its ready time, or missing a valid source
/// register) is a hard barrier: nothing younger may execute this cycle,
/// regardless of remaining bandwidth or its own readiness.
pub fn inorder_execute(state: &mut CoreState) -> u64 {
    let mut exec_bw = Bandwidth::new(state.config.exec_width);
    let now = state.current_time;
    let CoreState {
        config,
        window,
        regs,
        lsq,
        ..
    } = state;

    for entry in window.iter_mut() {
        if !exec_bw.has_remaining() {
            break;
        }
        if entry.executed {
            continue;
        }
        if entry.scheduled && entry.ready_time <= now {
            let ready = entry.instr.sources.iter().all(|&src| regs.is_valid(src));
            if !ready {
                // IN-ORDER STALL: can't skip past this instruction
                trace!("execute blocked at seq {}", entry.instr.seq);
                break;
            }
            do_execution(entry, lsq, config, now);
            exec_bw.consume();
        } else {
            // IN-ORDER STALL: unexecuted instruction not yet ready
            trace!("execute blocked at seq {}", entry.instr.seq);
            break;
        }
    }
    exec_bw.amount_consumed()
}

/// Functional + timing execution of one window entry. Sets `executed`
/// (exactly once per entry) and decides when results become visible:
/// ALU and branch work completes after the execute latency, memory work
/// goes through the load/store queue. A full queue charges a fixed
/// retry latency instead.
pub fn do_execution(entry: &mut WindowEntry, lsq: &mut Lsq, config: &CoreConfig, now: Timestamp) {
    debug_assert!(!entry.executed, "seq {} executed twice", entry.instr.seq);
    entry.executed = true;

    if entry.instr.kind.is_memory() {
        let ready_at = now + config.latency_ps(config.memory_latency);
        if lsq.push(entry.instr.seq, ready_at) {
            entry.completion_time = None; // stamped by the memory return pass
        } else {
            entry.completion_time = Some(now + config.latency_ps(config.lsq_retry_latency));
        }
    } else {
        entry.completion_time = Some(now + config.latency_ps(config.exec_latency));
    }
}
