use crate::sequencing::{GrooveLfo, Pattern, Transport, PATTERN_LEN};
use crate::voices::VoiceId;

/*
Look-Ahead Scheduler
====================

Converts pattern + tempo into precisely timed trigger events without drift.
The trick is the two-clock split:

  WHAT to schedule is decided at a lazy cadence - the engine's control
  thread calls `tick()` every ~15 ms, far from the audio thread.

  WHEN a hit sounds is an absolute audio-clock timestamp computed by
  repeated addition of the exact step duration, handed to the sink before
  the deadline arrives.

Because timestamps never come from "now", jitter in the tick cadence can
only change how far ahead the window is filled - it cannot move a hit that
has already been scheduled, and it cannot accumulate: trigger #1000 lands
at exactly 1000 step durations after the first, however unevenly the ticks
fired.

Each tick drains the window: while the next step falls inside
`now + LOOKAHEAD_WINDOW`, fire every lane whose step set contains the
current index (independent humanization draws per lane), then advance the
step (wrapping at the 1536-step pattern) and the trigger time.
*/

/// How far into the future the scheduler keeps the queue filled.
pub const LOOKAHEAD_WINDOW: f64 = 0.1;

/// Margin between `start()` and the first step, so the first hits are
/// never scheduled in the past.
pub const STARTUP_MARGIN: f64 = 0.05;

/// One scheduled hit. Ephemeral: produced here, consumed immediately by
/// the sink, never persisted.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub voice: VoiceId,
    /// Absolute audio-clock time, humanization offset already applied.
    pub time: f64,
    pub velocity: f32,
    pub velocity_scale: f32,
    pub pan: f32,
}

/// Where triggers go: the engine's playback sink in production, a plain
/// `Vec` in tests and offline bounces.
pub trait TriggerSink {
    fn trigger(&mut self, trigger: Trigger);
}

impl TriggerSink for Vec<Trigger> {
    fn trigger(&mut self, trigger: Trigger) {
        self.push(trigger);
    }
}

pub struct LookaheadScheduler {
    pattern: Pattern,
    bpm: f64,
    transport: Transport,
    lfo: GrooveLfo,
    excitement: f32,
    next_trigger_time: f64,
    step_index: u32,
    running: bool,
    rng: fastrand::Rng,
}

impl LookaheadScheduler {
    pub fn new(pattern: Pattern, bpm: f64) -> Self {
        let transport = Transport::new(0.0, bpm);
        Self {
            pattern,
            bpm,
            transport,
            lfo: GrooveLfo::new(transport),
            excitement: 1.0,
            next_trigger_time: 0.0,
            step_index: 0,
            running: false,
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic drop-chance draws, used by tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Begin walking the pattern. The first step lands `STARTUP_MARGIN`
    /// after `now` on the audio clock.
    pub fn start(&mut self, now: f64) {
        self.transport = Transport::new(now + STARTUP_MARGIN, self.bpm);
        self.lfo.set_transport(self.transport);
        self.next_trigger_time = now + STARTUP_MARGIN;
        self.step_index = 0;
        self.running = true;
    }

    /// Halt the walk immediately. Already-scheduled triggers are the
    /// sink's business and play out naturally.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tempo change takes effect from the next scheduled step.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
        self.transport = self.transport.with_bpm(bpm);
        self.lfo.set_transport(self.transport);
    }

    pub fn set_excitement(&mut self, excitement: f32) {
        self.excitement = excitement.clamp(0.0, 1.0);
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
    }

    pub fn step_index(&self) -> u32 {
        self.step_index
    }

    /// Fill the look-ahead window. Call at UI-refresh cadence with the
    /// current audio-clock time; cheap no-op when the window is full.
    pub fn tick(&mut self, now: f64, sink: &mut dyn TriggerSink) {
        if !self.running {
            return;
        }

        let step_duration = self.transport.step_duration();

        while self.next_trigger_time < now + LOOKAHEAD_WINDOW {
            for voice in VoiceId::ALL {
                if !self.pattern.contains(voice, self.step_index) {
                    continue;
                }
                let draw = self.rng.f32();
                if !GrooveLfo::passes_gate(voice, self.excitement, draw) {
                    continue;
                }

                let humanization = self.lfo.humanize(voice, self.next_trigger_time);
                sink.trigger(Trigger {
                    voice,
                    time: self.next_trigger_time + humanization.time_offset,
                    velocity: 1.0,
                    velocity_scale: humanization.velocity_scale,
                    pan: humanization.pan,
                });
            }

            self.step_index = (self.step_index + 1) % PATTERN_LEN as u32;
            self.next_trigger_time += step_duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut LookaheadScheduler, until: f64) -> Vec<Trigger> {
        // Tick at an uneven cadence on purpose: jitter in WHEN ticks run
        // must not affect WHEN triggers are scheduled
        let mut triggers = Vec::new();
        let mut now = 0.0;
        let cadences = [0.013, 0.021, 0.008, 0.017];
        let mut i = 0;
        while now < until {
            scheduler.tick(now, &mut triggers);
            now += cadences[i % cadences.len()];
            i += 1;
        }
        triggers
    }

    #[test]
    fn single_lane_fires_once_per_bar_without_drift() {
        let pattern = Pattern::new().with_steps(VoiceId::Kick, [0]);
        let mut scheduler = LookaheadScheduler::new(pattern, 120.0).with_seed(1);
        scheduler.start(0.0);

        let triggers = drain(&mut scheduler, 60.0);
        assert!(triggers.len() >= 30, "got only {} bars", triggers.len());

        // Kick has a small humanization time depth; compare against the
        // nominal grid with that slack
        let step = 60.0 / 120.0 / 12.0;
        let bar = 48.0 * step;
        for (n, trigger) in triggers.iter().enumerate() {
            let expected = STARTUP_MARGIN + n as f64 * bar;
            assert!(
                (trigger.time - expected).abs() < 0.005,
                "bar {n} drifted: expected {expected}, got {}",
                trigger.time
            );
        }
    }

    #[test]
    fn step_index_wraps_without_gap_or_duplicate() {
        // Kick on the last step and on step 0: wrapping must play both,
        // exactly one step apart
        let pattern = Pattern::new().with_steps(VoiceId::Kick, [0, PATTERN_LEN as u32 - 1]);
        let mut scheduler = LookaheadScheduler::new(pattern, 960.0).with_seed(2);
        scheduler.start(0.0);

        // 960 bpm: pattern of 1536 steps lasts 8 s
        let triggers = drain(&mut scheduler, 17.0);

        let step = 60.0 / 960.0 / 12.0;
        let mut times: Vec<f64> = triggers.iter().map(|t| t.time).collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // First loop boundary: last step of loop 0 and step 0 of loop 1
        let last_of_first = STARTUP_MARGIN + (PATTERN_LEN as f64 - 1.0) * step;
        let first_of_second = STARTUP_MARGIN + PATTERN_LEN as f64 * step;
        assert!(
            times.iter().any(|t| (t - last_of_first).abs() < 0.006),
            "missing final step of the loop"
        );
        assert!(
            times.iter().any(|t| (t - first_of_second).abs() < 0.006),
            "missing step 0 after wrap"
        );
    }

    #[test]
    fn shared_step_fires_all_matching_lanes() {
        let pattern = Pattern::new()
            .with_steps(VoiceId::Kick, [0])
            .with_steps(VoiceId::Snare, [0])
            .with_steps(VoiceId::HatClosed, [0]);
        let mut scheduler = LookaheadScheduler::new(pattern, 120.0).with_seed(3);
        scheduler.start(0.0);

        let mut triggers = Vec::new();
        scheduler.tick(0.0, &mut triggers);

        let at_zero: Vec<_> = triggers
            .iter()
            .filter(|t| (t.time - STARTUP_MARGIN).abs() < 0.02)
            .collect();
        assert_eq!(at_zero.len(), 3, "all lanes on a shared step must fire");
    }

    #[test]
    fn trigger_times_are_monotonic_per_lane_nominal_grid() {
        let pattern = Pattern::new().with_steps(VoiceId::Kick, (0..48).map(|i| i * 12));
        let mut scheduler = LookaheadScheduler::new(pattern, 140.0).with_seed(4);
        scheduler.start(0.0);

        let triggers = drain(&mut scheduler, 10.0);
        // Kick time depth (4 ms) is far below the beat spacing, so even
        // humanized times must be strictly increasing
        for pair in triggers.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn stop_halts_scheduling_immediately() {
        let pattern = Pattern::new().with_steps(VoiceId::Kick, [0]);
        let mut scheduler = LookaheadScheduler::new(pattern, 120.0).with_seed(5);
        scheduler.start(0.0);

        let mut triggers = Vec::new();
        scheduler.tick(0.0, &mut triggers);
        let before = triggers.len();

        scheduler.stop();
        scheduler.tick(10.0, &mut triggers);
        assert_eq!(triggers.len(), before, "stop must cancel future scheduling");
    }

    #[test]
    fn accent_lane_is_dense_at_full_excitement_and_silent_at_zero() {
        let every_sixteenth: Vec<u32> = (0..PATTERN_LEN as u32).step_by(3).collect();
        let pattern = Pattern::new().with_steps(VoiceId::HatClosed32, every_sixteenth.clone());

        let mut excited = LookaheadScheduler::new(pattern.clone(), 120.0).with_seed(6);
        excited.set_excitement(1.0);
        excited.start(0.0);
        let hits = drain(&mut excited, 4.0);
        // 4 s at 120 bpm = 96 grid steps = 32 accent steps, all passing
        assert!(hits.len() >= 30, "full excitement should keep the lane dense");

        let mut flat = LookaheadScheduler::new(pattern, 120.0).with_seed(6);
        flat.set_excitement(0.0);
        flat.start(0.0);
        let silent = drain(&mut flat, 4.0);
        assert!(silent.is_empty(), "zero excitement must gate the accent lane off");
    }

    #[test]
    fn end_to_end_two_bar_figure_at_120() {
        // kick on beat 1 of bars 1 and 2, snare on beat 3 of bar 1
        let pattern = Pattern::new()
            .with_steps(VoiceId::Kick, [0, 48])
            .with_steps(VoiceId::Snare, [24]);
        let mut scheduler = LookaheadScheduler::new(pattern, 120.0).with_seed(7);
        scheduler.start(0.0);

        let triggers = drain(&mut scheduler, 7.0);
        let step = 60.0 / 120.0 / 12.0;

        let find = |voice: VoiceId, expected: f64| {
            triggers.iter().any(|t| {
                t.voice == voice && (t.time - (STARTUP_MARGIN + expected)).abs() < 0.01
            })
        };

        assert!(find(VoiceId::Kick, 0.0), "kick at 0 s");
        assert!(find(VoiceId::Snare, 24.0 * step), "snare at 1.0 s");
        assert!(find(VoiceId::Kick, 48.0 * step), "kick at 2.0 s");
    }
}
