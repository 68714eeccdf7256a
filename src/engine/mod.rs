//! The engine facade: one struct tying the scheduler, the renderer or
//! cache, the mix bus and the output stream together.
//!
//! Threading layout:
//! - the caller's thread owns [`DrumEngine`] and sends control messages
//! - a control thread (~15 ms cadence) drains messages, runs the
//!   look-ahead scheduler and turns triggers into playable buffers
//! - the cpal callback consumes scheduled hits and mixes them
//!
//! Both hand-offs are SPSC rings, so no thread ever blocks on another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::io::{AudioClock, AudioOutput, ScheduledHit};
use crate::sequencing::Pattern;
use crate::voices::{HitParams, VoiceId, VoiceRenderer};

pub mod bus;
pub mod cache;
pub mod offline;
pub mod scheduler;

use bus::BusControls;
use cache::PreRenderCache;
use scheduler::{LookaheadScheduler, Trigger, TriggerSink};

pub use cache::CacheState;

/// Control thread cadence. Comfortably inside the scheduler's 100 ms
/// look-ahead window.
const TICK_INTERVAL: Duration = Duration::from_millis(15);

/// Small latency added to one-shot hits so they are never scheduled in
/// the past relative to the audio callback.
const ONE_SHOT_LATENCY: f64 = 0.02;

const CONTROL_QUEUE_CAPACITY: usize = 128;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("querying the default stream config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("opening the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("starting the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// How hits become audio.
///
/// `Live` synthesizes each hit on trigger, so no two hits are identical
/// (fresh noise read positions every time). `PreRendered` renders each
/// drum once up front and replays the cached buffer, trading variation
/// for near-zero trigger cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Live,
    PreRendered,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub bpm: f64,
    /// 0..1 energy macro; gates the accent lane and thins busy lanes.
    pub excitement: f32,
    pub mode: RenderMode,
    pub pattern: Pattern,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            excitement: 1.0,
            mode: RenderMode::PreRendered,
            pattern: Pattern::new(),
        }
    }
}

/// Per-hit options for the one-shot `play_*` API.
#[derive(Debug, Clone, Copy)]
pub struct HitOptions {
    /// -1 hard left .. +1 hard right.
    pub pan: f32,
    /// Seconds added to the hit's schedule time.
    pub time_offset: f64,
    /// Extra multiplier on top of velocity.
    pub velocity_scale: f32,
}

impl Default for HitOptions {
    fn default() -> Self {
        Self {
            pan: 0.0,
            time_offset: 0.0,
            velocity_scale: 1.0,
        }
    }
}

enum ControlMsg {
    Start,
    Stop,
    SetBpm(f64),
    SetExcitement(f32),
    SetPattern(Box<Pattern>),
    Play {
        voice: VoiceId,
        velocity: f32,
        opts: HitOptions,
    },
}

pub struct DrumEngine {
    output: AudioOutput,
    controls: Arc<BusControls>,
    cache: PreRenderCache,
    control_tx: rtrb::Producer<ControlMsg>,
    shutdown: Arc<AtomicBool>,
    control_thread: Option<JoinHandle<()>>,
}

impl DrumEngine {
    /// Open the default output device and spin up the control thread. In
    /// pre-rendered mode this also kicks off the background cache warm-up.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let controls = BusControls::new();
        let (output, hit_producer) = AudioOutput::start(Arc::clone(&controls))?;
        let clock = output.clock();

        let cache = PreRenderCache::new();
        if config.mode == RenderMode::PreRendered {
            cache.warm_up(clock.sample_rate() as f32);
        }

        let (control_tx, control_rx) = rtrb::RingBuffer::new(CONTROL_QUEUE_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_cache = cache.clone();
        let thread_shutdown = Arc::clone(&shutdown);
        let control_thread = thread::spawn(move || {
            control_loop(
                config,
                control_rx,
                hit_producer,
                clock,
                thread_cache,
                thread_shutdown,
            )
        });

        Ok(Self {
            output,
            controls,
            cache,
            control_tx,
            shutdown,
            control_thread: Some(control_thread),
        })
    }

    /// Start pattern playback from step 0.
    pub fn start(&mut self) {
        self.resume_clock();
        self.send(ControlMsg::Start);
    }

    /// Stop pattern playback. Hits already scheduled play out naturally;
    /// nothing in flight is cut off.
    pub fn stop(&mut self) {
        self.send(ControlMsg::Stop);
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.send(ControlMsg::SetBpm(bpm.clamp(20.0, 999.0)));
    }

    pub fn set_excitement(&mut self, excitement: f32) {
        self.send(ControlMsg::SetExcitement(excitement));
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.send(ControlMsg::SetPattern(Box::new(pattern)));
    }

    /// Master volume, 0..2 (unity at 1.0). Takes effect within one audio
    /// block.
    pub fn set_volume(&self, volume: f32) {
        self.controls.set_volume(volume);
    }

    /// Master low-pass macro, 0..1 mapped onto 200 Hz..20 kHz.
    pub fn set_low_pass(&self, amount: f32) {
        self.controls.set_low_pass(amount);
    }

    pub fn cache_state(&self, voice: VoiceId) -> CacheState {
        self.cache.state(voice)
    }

    /// Trigger one hit outside the pattern, e.g. from a pad press.
    ///
    /// `velocity` scales amplitude linearly and is not validated; values
    /// above 1.0 are a legitimate way to push a hit over the pattern.
    pub fn play(&mut self, voice: VoiceId, velocity: f32, opts: HitOptions) {
        self.resume_clock();
        self.send(ControlMsg::Play {
            voice,
            velocity,
            opts,
        });
    }

    pub fn play_kick(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::Kick, velocity, opts);
    }

    pub fn play_snare(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::Snare, velocity, opts);
    }

    pub fn play_clap(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::Clap, velocity, opts);
    }

    pub fn play_tom_low(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::TomLow, velocity, opts);
    }

    pub fn play_tom_mid(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::TomMid, velocity, opts);
    }

    pub fn play_tom_hi(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::TomHi, velocity, opts);
    }

    pub fn play_hat_closed(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::HatClosed, velocity, opts);
    }

    pub fn play_hat_open(&mut self, velocity: f32, opts: HitOptions) {
        self.play(VoiceId::HatOpen, velocity, opts);
    }

    /// The device may suspend the stream (e.g. default-device change or a
    /// platform power policy); every user-facing trigger nudges it back.
    fn resume_clock(&self) {
        if let Err(err) = self.output.resume() {
            log::debug!("could not resume output stream: {err}");
        }
    }

    fn send(&mut self, msg: ControlMsg) {
        if self.control_tx.push(msg).is_err() {
            log::warn!("control queue full; message dropped");
        }
    }
}

impl Drop for DrumEngine {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.control_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Turns scheduler triggers into playable buffers on the hit queue.
struct PlaybackSink {
    mode: RenderMode,
    cache: PreRenderCache,
    renderer: VoiceRenderer,
    hits: rtrb::Producer<ScheduledHit>,
}

impl TriggerSink for PlaybackSink {
    fn trigger(&mut self, trigger: Trigger) {
        let voice = trigger.voice.sound();

        let (samples, gain): (Arc<[f32]>, f32) = match self.mode {
            RenderMode::PreRendered => match self.cache.buffer(voice) {
                // Cached buffers are rendered at full velocity; velocity
                // becomes a playback gain
                Some(buffer) => (buffer, trigger.velocity * trigger.velocity_scale),
                None => {
                    log::debug!("skipping {}: cache not ready", voice.name());
                    return;
                }
            },
            RenderMode::Live => {
                let samples = self.renderer.render(
                    &voice.descriptor(),
                    HitParams {
                        velocity: trigger.velocity,
                        velocity_scale: trigger.velocity_scale,
                    },
                );
                (samples.into(), 1.0)
            }
        };

        let hit = ScheduledHit {
            samples,
            start_time: trigger.time,
            gain,
            pan: trigger.pan,
        };
        if self.hits.push(hit).is_err() {
            log::warn!("hit queue full; dropping {}", voice.name());
        }
    }
}

fn control_loop(
    config: EngineConfig,
    mut control_rx: rtrb::Consumer<ControlMsg>,
    hit_producer: rtrb::Producer<ScheduledHit>,
    clock: AudioClock,
    cache: PreRenderCache,
    shutdown: Arc<AtomicBool>,
) {
    let mut scheduler = LookaheadScheduler::new(config.pattern, config.bpm);
    scheduler.set_excitement(config.excitement);

    let mut sink = PlaybackSink {
        mode: config.mode,
        cache,
        renderer: VoiceRenderer::new(clock.sample_rate() as f32),
        hits: hit_producer,
    };

    // Start requests arriving while the clock is still suspended are
    // retried every pass until the first callback lands
    let mut pending_start = false;

    while !shutdown.load(Ordering::SeqCst) {
        while let Ok(msg) = control_rx.pop() {
            match msg {
                ControlMsg::Start => match clock.now() {
                    Some(now) => scheduler.start(now),
                    None => pending_start = true,
                },
                ControlMsg::Stop => {
                    scheduler.stop();
                    pending_start = false;
                }
                ControlMsg::SetBpm(bpm) => scheduler.set_bpm(bpm),
                ControlMsg::SetExcitement(excitement) => scheduler.set_excitement(excitement),
                ControlMsg::SetPattern(pattern) => scheduler.set_pattern(*pattern),
                ControlMsg::Play {
                    voice,
                    velocity,
                    opts,
                } => match clock.now() {
                    Some(now) => sink.trigger(Trigger {
                        voice,
                        time: now + ONE_SHOT_LATENCY + opts.time_offset,
                        velocity,
                        velocity_scale: opts.velocity_scale,
                        pan: opts.pan,
                    }),
                    None => log::debug!("dropping one-shot {}: clock suspended", voice.name()),
                },
            }
        }

        if pending_start {
            if let Some(now) = clock.now() {
                scheduler.start(now);
                pending_start = false;
            }
        }

        if scheduler.is_running() {
            match clock.now() {
                Some(now) => scheduler.tick(now, &mut sink),
                None => log::trace!("audio clock suspended; skipping tick"),
            }
        }

        thread::sleep(TICK_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sink(mode: RenderMode, cache: PreRenderCache) -> (PlaybackSink, rtrb::Consumer<ScheduledHit>) {
        let (producer, consumer) = rtrb::RingBuffer::new(16);
        let sink = PlaybackSink {
            mode,
            cache,
            renderer: VoiceRenderer::with_seed(SAMPLE_RATE, 42),
            hits: producer,
        };
        (sink, consumer)
    }

    fn kick_trigger(time: f64, velocity: f32) -> Trigger {
        Trigger {
            voice: VoiceId::Kick,
            time,
            velocity,
            velocity_scale: 1.0,
            pan: 0.0,
        }
    }

    #[test]
    fn live_sink_renders_and_queues_each_trigger() {
        let (mut sink, mut consumer) = sink(RenderMode::Live, PreRenderCache::new());

        sink.trigger(kick_trigger(0.5, 1.0));
        sink.trigger(kick_trigger(1.0, 0.5));

        let first = consumer.pop().expect("first hit queued");
        let second = consumer.pop().expect("second hit queued");
        assert_eq!(first.start_time, 0.5);
        assert_eq!(second.start_time, 1.0);
        // Live mode bakes velocity into the samples
        assert_eq!(first.gain, 1.0);
        assert_eq!(second.gain, 1.0);
        assert!(first.samples.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn prerendered_sink_skips_until_cache_is_ready() {
        let cache = PreRenderCache::new();
        let (mut sink, mut consumer) = sink(RenderMode::PreRendered, cache.clone());

        sink.trigger(kick_trigger(0.5, 1.0));
        assert!(consumer.pop().is_err(), "cold cache must skip, not stall");

        cache.warm_up_blocking(SAMPLE_RATE);
        sink.trigger(kick_trigger(1.0, 0.75));
        let hit = consumer.pop().expect("warm cache queues the hit");
        assert_eq!(hit.gain, 0.75, "cached mode applies velocity as gain");
    }

    #[test]
    fn above_unity_velocity_is_not_flattened() {
        let cache = PreRenderCache::new();
        cache.warm_up_blocking(SAMPLE_RATE);
        let (mut sink, mut consumer) = sink(RenderMode::PreRendered, cache);

        sink.trigger(kick_trigger(0.5, 1.5));
        let hit = consumer.pop().expect("hit queued");
        assert_eq!(hit.gain, 1.5, "velocity above 1.0 must pass through");
    }

    #[test]
    fn prerendered_hits_share_one_buffer() {
        let cache = PreRenderCache::new();
        cache.warm_up_blocking(SAMPLE_RATE);
        let (mut sink, mut consumer) = sink(RenderMode::PreRendered, cache);

        sink.trigger(kick_trigger(0.5, 1.0));
        sink.trigger(kick_trigger(1.0, 1.0));
        let a = consumer.pop().unwrap();
        let b = consumer.pop().unwrap();
        assert!(Arc::ptr_eq(&a.samples, &b.samples));
    }

    #[test]
    fn live_hits_differ_between_triggers() {
        let (mut sink, mut consumer) = sink(RenderMode::Live, PreRenderCache::new());

        sink.trigger(kick_trigger(0.5, 1.0));
        sink.trigger(kick_trigger(1.0, 1.0));
        let a = consumer.pop().unwrap();
        let b = consumer.pop().unwrap();
        assert_ne!(a.samples[..], b.samples[..], "live hits should vary");
    }

    #[test]
    fn config_defaults_are_sensible() {
        let config = EngineConfig::default();
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.excitement, 1.0);
        assert_eq!(config.mode, RenderMode::PreRendered);

        let opts = HitOptions::default();
        assert_eq!(opts.pan, 0.0);
        assert_eq!(opts.time_offset, 0.0);
        assert_eq!(opts.velocity_scale, 1.0);
    }
}
