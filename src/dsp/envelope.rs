use crate::{ENV_FLOOR, MIN_TIME};

/*
Percussive Envelope
===================

Drums do not sustain, so this is not an ADSR. The contour is:

  attack   linear ramp 0 -> 1, possibly in two stages (a fast ramp to a
           partial level, then a slower ramp to the peak - the clap "thwack")
  decay    exponential fall toward zero, stopped at ENV_FLOOR

Exponential decay is the defining percussion shape: a constant per-sample
multiplier, so the level halves in equal time intervals like a struck
membrane. The multiplier is derived from the decay time:

    coeff = ENV_FLOOR ^ (1 / (decay_seconds * sample_rate))

so `decay_seconds` after the peak, the level has fallen to ENV_FLOOR and
the envelope goes idle. Stopping at the floor rather than chasing zero
avoids denormals and gives downstream code a crisp "finished" signal.

State machine:

    Idle --trigger--> Attack [--> Attack2] --peak--> Decay --floor--> Idle

Retriggering from any stage restarts the attack from zero: repeated hits
must sound distinct, never continue a previous contour.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStage {
    Idle,
    Attack,
    Attack2,
    Decay,
}

#[derive(Debug, Clone, Copy)]
pub struct PercEnvelope {
    // Contour parameters (set once per layer)
    attack_time: f32,
    // Two-stage attack: ramp to `stage_level` in `attack_time`, then to 1.0
    // in `attack2_time`. Single-stage envelopes have attack2_time == 0.
    attack2_time: f32,
    stage_level: f32,
    decay_time: f32,

    // Runtime state
    stage: EnvStage,
    level: f32,
    elapsed: u32, // samples since the current stage began
}

impl PercEnvelope {
    /// Instant or single-ramp attack, exponential decay.
    ///
    /// `attack` of 0 (or anything under one sample) snaps straight to peak.
    pub fn percussive(attack: f32, decay: f32) -> Self {
        Self {
            attack_time: attack.max(0.0),
            attack2_time: 0.0,
            stage_level: 1.0,
            decay_time: decay.max(MIN_TIME),
            stage: EnvStage::Idle,
            level: 0.0,
            elapsed: 0,
        }
    }

    /// Two-stage attack: 0 -> `stage_level` in `attack`, then -> 1.0 in
    /// `attack2`, then exponential decay. Used by clap-like transients.
    pub fn two_stage(attack: f32, stage_level: f32, attack2: f32, decay: f32) -> Self {
        Self {
            attack_time: attack.max(0.0),
            attack2_time: attack2.max(MIN_TIME),
            stage_level: stage_level.clamp(0.0, 1.0),
            decay_time: decay.max(MIN_TIME),
            stage: EnvStage::Idle,
            level: 0.0,
            elapsed: 0,
        }
    }

    /// Start the contour from zero. Safe to call from any stage.
    pub fn trigger(&mut self) {
        self.level = 0.0;
        self.elapsed = 0;
        // Sub-half-millisecond attacks are audibly instant
        self.stage = if self.attack_time < 0.0005 && self.attack2_time == 0.0 {
            // Instant attack: skip straight to the decay from full level
            self.level = 1.0;
            EnvStage::Decay
        } else {
            EnvStage::Attack
        };
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvStage::Idle => {
                self.level = 0.0;
            }

            EnvStage::Attack => {
                let target = if self.attack2_time > 0.0 {
                    self.stage_level
                } else {
                    1.0
                };
                let increment = target / (self.attack_time.max(MIN_TIME) * sample_rate);
                self.level += increment;

                if self.level >= target {
                    self.level = target;
                    self.elapsed = 0;
                    self.stage = if self.attack2_time > 0.0 {
                        EnvStage::Attack2
                    } else {
                        EnvStage::Decay
                    };
                }
            }

            EnvStage::Attack2 => {
                let increment = (1.0 - self.stage_level) / (self.attack2_time * sample_rate);
                self.level += increment;

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.elapsed = 0;
                    self.stage = EnvStage::Decay;
                }
            }

            EnvStage::Decay => {
                let coeff = ENV_FLOOR.powf(1.0 / (self.decay_time * sample_rate));
                self.level *= coeff;

                if self.level <= ENV_FLOOR {
                    self.level = 0.0;
                    self.stage = EnvStage::Idle;
                }
            }
        }

        self.elapsed = self.elapsed.saturating_add(1);
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvStage {
        self.stage
    }

    /// Worst-case audible length in seconds: full attack plus the time for
    /// the exponential to reach the floor. Used to size render buffers.
    pub fn total_time(&self) -> f32 {
        self.attack_time + self.attack2_time + self.decay_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn run(env: &mut PercEnvelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample(SAMPLE_RATE);
        }
    }

    #[test]
    fn instant_attack_starts_at_peak() {
        let mut env = PercEnvelope::percussive(0.0, 0.1);
        env.trigger();
        assert!(env.level() >= 1.0 - 1e-6, "instant attack should snap to peak");
        assert_eq!(env.stage(), EnvStage::Decay);
    }

    #[test]
    fn linear_attack_reaches_peak() {
        let mut env = PercEnvelope::percussive(0.01, 0.1);
        env.trigger();
        run(&mut env, (0.01 * SAMPLE_RATE) as usize + 1);
        assert!(env.level() > 0.99, "attack should reach peak, got {}", env.level());
    }

    #[test]
    fn decay_reaches_floor_and_goes_idle() {
        let decay = 0.05;
        let mut env = PercEnvelope::percussive(0.0, decay);
        env.trigger();
        run(&mut env, (decay * SAMPLE_RATE) as usize + 2);

        assert!(!env.is_active(), "envelope should be idle after decay time");
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn decay_is_exponential_not_linear() {
        let mut env = PercEnvelope::percussive(0.0, 0.1);
        env.trigger();

        run(&mut env, 25);
        let quarter = env.level();
        run(&mut env, 25);
        let half = env.level();

        // Exponential: equal time intervals give equal ratios
        let ratio = half / quarter;
        let expected = quarter / 1.0;
        assert!(
            (ratio - expected).abs() < 0.05,
            "decay ratio drifted: {ratio} vs {expected}"
        );
    }

    #[test]
    fn two_stage_attack_pauses_at_stage_level() {
        let mut env = PercEnvelope::two_stage(0.01, 0.6, 0.02, 0.1);
        env.trigger();
        run(&mut env, (0.01 * SAMPLE_RATE) as usize + 1);

        assert_eq!(env.stage(), EnvStage::Attack2);
        assert!((env.level() - 0.6).abs() < 0.05);

        run(&mut env, (0.02 * SAMPLE_RATE) as usize + 1);
        assert_eq!(env.stage(), EnvStage::Decay);
        assert!(env.level() > 0.8, "should have just peaked, got {}", env.level());
    }

    #[test]
    fn retrigger_restarts_from_zero() {
        let mut env = PercEnvelope::percussive(0.01, 0.2);
        env.trigger();
        run(&mut env, 50);
        let mid = env.level();
        assert!(mid > 0.0);

        env.trigger();
        assert!(env.level() < mid, "retrigger should restart the contour");
    }
}
