/*
Transport
=========

A value object tying wall clock to musical time: when playback started and
how fast beats go by. Both the scheduler and the groove LFO take a
`Transport` rather than reading shared mutable engine fields - changing the
tempo means handing both a new value, so they can never disagree about
where beat 1 is.

Times are in seconds on the audio clock; `bpm` is beats per minute.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    pub start_time: f64,
    pub bpm: f64,
}

impl Transport {
    pub fn new(start_time: f64, bpm: f64) -> Self {
        Self { start_time, bpm }
    }

    /// Elapsed musical beats at audio-clock time `t`.
    #[inline]
    pub fn beats_at(&self, t: f64) -> f64 {
        (t - self.start_time) * self.bpm / 60.0
    }

    /// Duration of one grid step: a twelfth of a beat.
    #[inline]
    pub fn step_duration(&self) -> f64 {
        60.0 / self.bpm / crate::sequencing::pattern::STEPS_PER_BEAT as f64
    }

    /// Same transport, new tempo.
    pub fn with_bpm(self, bpm: f64) -> Self {
        Self { bpm, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beats_follow_tempo() {
        let transport = Transport::new(10.0, 120.0);
        assert_eq!(transport.beats_at(10.0), 0.0);
        assert_eq!(transport.beats_at(10.5), 1.0); // 120 bpm = 2 beats/sec
        assert_eq!(transport.beats_at(14.0), 8.0);
    }

    #[test]
    fn step_duration_is_a_twelfth_of_a_beat() {
        let transport = Transport::new(0.0, 120.0);
        // One beat at 120 bpm is 0.5 s; a step is 0.5 / 12
        assert!((transport.step_duration() - 0.5 / 12.0).abs() < 1e-12);
    }
}
