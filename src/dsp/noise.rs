#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Noise Table
===========

One second of mono pseudo-random noise, generated once and reused as raw
material by every noise layer. Each hit reads the table from a random start
offset (wrapping), so overlapping hits never share an identical burst while
the table itself is built exactly once.

Two colors:

  White   independent samples, flat spectrum - snare rattle, clap crack
  Pink    "pink-leaning" by mild one-pole correlation - darker hat tails
          and room-ish textures. Not a true -3 dB/octave pink; the mild
          correlation is all the drum recipes need.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
}

pub struct NoiseTable {
    samples: Vec<f32>,
}

/// Correlation coefficient for the pink-leaning table. Higher = darker.
const PINK_CORRELATION: f32 = 0.7;

impl NoiseTable {
    /// Generate one second of noise at the given sample rate.
    ///
    /// A fixed seed makes a table reproducible, but two tables built with
    /// different seeds are equally valid "takes" - nothing downstream
    /// depends on the exact sample values.
    pub fn generate(color: NoiseColor, sample_rate: f32, seed: u64) -> Self {
        let len = sample_rate.max(1.0) as usize;
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut samples = Vec::with_capacity(len);

        match color {
            NoiseColor::White => {
                for _ in 0..len {
                    samples.push(rng.f32() * 2.0 - 1.0);
                }
            }
            NoiseColor::Pink => {
                let mut last = 0.0f32;
                let mut peak = 0.0f32;
                for _ in 0..len {
                    let white = rng.f32() * 2.0 - 1.0;
                    last = PINK_CORRELATION * last + (1.0 - PINK_CORRELATION) * white;
                    peak = peak.max(last.abs());
                    samples.push(last);
                }
                // Correlation shrinks amplitude; normalize back to full scale
                if peak > 0.0 {
                    for s in &mut samples {
                        *s /= peak;
                    }
                }
            }
        }

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read one sample, wrapping at the table end.
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.samples[index % self.samples.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_one_second_long() {
        let table = NoiseTable::generate(NoiseColor::White, 48_000.0, 1);
        assert_eq!(table.len(), 48_000);
    }

    #[test]
    fn samples_stay_in_range() {
        for color in [NoiseColor::White, NoiseColor::Pink] {
            let table = NoiseTable::generate(color, 8_000.0, 7);
            for i in 0..table.len() {
                let s = table.at(i);
                assert!((-1.0..=1.0).contains(&s), "{color:?} sample {s} out of range");
            }
        }
    }

    #[test]
    fn reads_wrap_at_table_end() {
        let table = NoiseTable::generate(NoiseColor::White, 1_000.0, 3);
        assert_eq!(table.at(0), table.at(table.len()));
        assert_eq!(table.at(5), table.at(table.len() + 5));
    }

    #[test]
    fn pink_is_smoother_than_white() {
        let white = NoiseTable::generate(NoiseColor::White, 8_000.0, 11);
        let pink = NoiseTable::generate(NoiseColor::Pink, 8_000.0, 11);

        let mean_step = |t: &NoiseTable| {
            (1..t.len())
                .map(|i| (t.at(i) - t.at(i - 1)).abs())
                .sum::<f32>()
                / (t.len() - 1) as f32
        };

        assert!(
            mean_step(&pink) < mean_step(&white),
            "correlated noise should move less per sample"
        );
    }
}
