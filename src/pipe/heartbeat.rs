use std::time::{Duration, Instant};

use log::info;

use crate::pipe::state::CoreState;

/// Wall-clock source for the heartbeat line. Injected so the monitor
/// carries no hidden process-wide state and tests can substitute a
/// fixed clock.
pub trait WallClock {
    fn elapsed(&self) -> Duration;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Periodic throughput diagnostic. Fires once `num_retired` has grown
/// by at least one period since the last firing (`>=`, since several
/// instructions can retire in one cycle and overshoot the threshold).
/// Pure observability: it latches its own bookkeeping counters and
/// touches nothing else.
pub struct Heartbeat {
    enabled: bool,
    period: u64,
    clock: Box<dyn WallClock>,
}

impl Heartbeat {
    pub fn new(enabled: bool, period: u64, clock: Box<dyn WallClock>) -> Self {
        Self {
            enabled,
            period,
            clock,
        }
    }

    /// Evaluate after all stage work for the cycle. Returns whether the
    /// heartbeat fired.
    pub fn observe(&mut self, core_id: usize, state: &mut CoreState) -> bool {
        if !self.enabled || state.num_retired < state.last_heartbeat_instr + self.period {
            return false;
        }

        let period_ps = state.config.clock_period_ps as f64;
        let heartbeat_instr = (state.num_retired - state.last_heartbeat_instr) as f64;
        let heartbeat_cycle = (state.current_time - state.last_heartbeat_time) as f64 / period_ps;
        let phase_instr = (state.num_retired - state.begin_phase_instr) as f64;
        let phase_cycle = (state.current_time - state.begin_phase_time) as f64 / period_ps;

        info!(
            target: "heartbeat",
            "Heartbeat CPU {} instructions: {} cycles: {} heartbeat IPC: {} cumulative IPC: {} (Simulation time: {})",
            core_id,
            state.num_retired,
            state.elapsed_cycles(),
            sig4(heartbeat_instr / heartbeat_cycle),
            sig4(phase_instr / phase_cycle),
            format_hms(self.clock.elapsed()),
        );

        state.last_heartbeat_instr = state.num_retired;
        state.last_heartbeat_time = state.current_time;
        true
    }
}

/// Format with four significant digits, switching to scientific
/// notation once the integral part alone would exceed four.
fn sig4(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return format!("{value}");
    }
    // 9999.5 would round up to a fifth digit in fixed notation.
    if value.abs() >= 9999.5 {
        return format!("{value:.3e}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (3 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

fn format_hms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{} hr {} min {} sec",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
