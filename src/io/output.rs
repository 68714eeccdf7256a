use std::f32::consts::FRAC_PI_4;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::engine::bus::{BusControls, MixBus};
use crate::engine::EngineError;

/*
Audio Output
============

One cpal output stream owns playback. The callback does exactly three
things, all allocation-free:

  1. drain newly scheduled hits from the SPSC ring into the active list
  2. sum active hits into stereo scratch at their absolute start frames
  3. run the mix bus per channel and interleave into the device buffer

Time is frames: the callback counts frames played into an atomic, and
`AudioClock::now()` divides by the sample rate. Everything upstream (the
scheduler, the groove LFO) speaks this clock, so "schedule at t" means "a
sample offset in some future callback", immune to wall-clock drift.

Buffer ownership is explicit: a hit arrives holding an `Arc` to its
samples, lives on the active list while it plays, and is released by the
`retain` sweep when its cursor runs off the end. Nothing is freed on the
audio thread except the Arc refcount decrement.
*/

/// Capacity of the hit ring. The densest pattern schedules well under
/// this per look-ahead window.
const HIT_QUEUE_CAPACITY: usize = 256;

/// Scratch size covers the largest callback cpal hands out in practice.
const MAX_FRAMES: usize = 4096;

/// A hit handed to the audio thread: shared samples plus playback params.
pub struct ScheduledHit {
    pub samples: Arc<[f32]>,
    /// Absolute audio-clock time in seconds.
    pub start_time: f64,
    pub gain: f32,
    /// -1 hard left .. +1 hard right, equal-power law.
    pub pan: f32,
}

struct ActiveHit {
    samples: Arc<[f32]>,
    start_frame: u64,
    pos: usize,
    gain_left: f32,
    gain_right: f32,
}

impl ActiveHit {
    fn new(hit: ScheduledHit, sample_rate: f64) -> Self {
        let angle = (hit.pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
        Self {
            samples: hit.samples,
            start_frame: (hit.start_time.max(0.0) * sample_rate) as u64,
            pos: 0,
            gain_left: hit.gain * angle.cos(),
            gain_right: hit.gain * angle.sin(),
        }
    }

    fn finished(&self) -> bool {
        self.pos >= self.samples.len()
    }
}

/// Cheap, cloneable view of the stream's frame clock.
#[derive(Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    sample_rate: f64,
}

impl AudioClock {
    /// Current playback time in seconds, or `None` while the stream has
    /// not produced a callback yet (device suspended or still opening).
    pub fn now(&self) -> Option<f64> {
        if !self.running.load(Ordering::Acquire) {
            return None;
        }
        Some(self.frames.load(Ordering::Acquire) as f64 / self.sample_rate)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

pub struct AudioOutput {
    stream: cpal::Stream,
    clock: AudioClock,
}

impl AudioOutput {
    /// Open the default output device and start the stream. Returns the
    /// output handle and the producer end of the hit ring.
    pub fn start(
        controls: Arc<BusControls>,
    ) -> Result<(Self, rtrb::Producer<ScheduledHit>), EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;

        let (producer, mut consumer) = rtrb::RingBuffer::<ScheduledHit>::new(HIT_QUEUE_CAPACITY);

        let frames = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(false));
        let clock = AudioClock {
            frames: Arc::clone(&frames),
            running: Arc::clone(&running),
            sample_rate,
        };

        let mut bus = MixBus::new(controls);
        let mut active: Vec<ActiveHit> = Vec::with_capacity(HIT_QUEUE_CAPACITY);
        let mut left = vec![0.0f32; MAX_FRAMES];
        let mut right = vec![0.0f32; MAX_FRAMES];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                running.store(true, Ordering::Release);

                let frame_count = (data.len() / channels).min(MAX_FRAMES);
                let block_start = frames.load(Ordering::Relaxed);

                while let Ok(hit) = consumer.pop() {
                    active.push(ActiveHit::new(hit, sample_rate));
                }

                let left = &mut left[..frame_count];
                let right = &mut right[..frame_count];
                left.fill(0.0);
                right.fill(0.0);

                for hit in active.iter_mut() {
                    // Hits scheduled mid-block start at their exact frame;
                    // late hits (start already past) begin immediately
                    let begin = hit
                        .start_frame
                        .saturating_sub(block_start)
                        .min(frame_count as u64) as usize;
                    for i in begin..frame_count {
                        if hit.finished() {
                            break;
                        }
                        let sample = hit.samples[hit.pos];
                        left[i] += sample * hit.gain_left;
                        right[i] += sample * hit.gain_right;
                        hit.pos += 1;
                    }
                }
                active.retain(|hit| !hit.finished());

                bus.process_channel(0, left, sample_rate as f32);
                bus.process_channel(1, right, sample_rate as f32);

                for (i, frame) in data.chunks_mut(channels).enumerate() {
                    if i >= frame_count {
                        frame.fill(0.0);
                        continue;
                    }
                    match frame.len() {
                        1 => frame[0] = 0.5 * (left[i] + right[i]),
                        _ => {
                            frame[0] = left[i];
                            frame[1] = right[i];
                            for extra in frame.iter_mut().skip(2) {
                                *extra = 0.0;
                            }
                        }
                    }
                }

                frames.fetch_add((data.len() / channels) as u64, Ordering::Release);
            },
            |err| log::error!("output stream error: {err}"),
            None,
        )?;

        stream.play()?;

        Ok((Self { stream, clock }, producer))
    }

    pub fn clock(&self) -> AudioClock {
        self.clock.clone()
    }

    /// Ask the device to (re)start delivering callbacks. Safe to call on a
    /// stream that is already playing.
    pub fn resume(&self) -> Result<(), EngineError> {
        self.stream.play()?;
        Ok(())
    }
}
