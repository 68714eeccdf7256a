use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::dsp::eq::{soft_clip, BiquadEq};
use crate::dsp::filter::SVFilter;

/*
Mix Bus
=======

Fixed coloration chain shared by both engine modes, run per channel after
the active hits have been summed:

    low shelf (+2 dB @ 120 Hz)
      -> peaking cut (-1.5 dB @ 450 Hz)
      -> tanh saturation
      -> master low-pass (the macro filter)
      -> master gain

Volume and the low-pass amount are the engine's two realtime knobs. They
are plain f32s stored as atomic bit patterns, so the UI thread can set
them and the audio thread read them without locks. The low-pass amount is
a 0..1 macro mapped linearly onto 200 Hz..20 kHz; at 1.0 the filter is
effectively open.
*/

const SHELF_FREQ: f32 = 120.0;
const SHELF_GAIN_DB: f32 = 2.0;
const MUD_FREQ: f32 = 450.0;
const MUD_GAIN_DB: f32 = -1.5;
const MUD_Q: f32 = 1.0;
const SATURATION_DRIVE: f32 = 1.6;

const LOWPASS_MIN_HZ: f32 = 200.0;
const LOWPASS_MAX_HZ: f32 = 20_000.0;

/// Shared control surface for the bus: lock-free setters for the engine's
/// public `set_volume` / `set_low_pass` knobs.
pub struct BusControls {
    volume_bits: AtomicU32,
    lowpass_bits: AtomicU32,
}

impl BusControls {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
            lowpass_bits: AtomicU32::new(1.0f32.to_bits()),
        })
    }

    /// Master gain, 0..2. Unity at 1.0; the top half is boost headroom.
    pub fn set_volume(&self, volume: f32) {
        let volume = volume.clamp(0.0, 2.0);
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    /// Macro low-pass amount in 0..1.
    pub fn set_low_pass(&self, amount: f32) {
        let amount = amount.clamp(0.0, 1.0);
        self.lowpass_bits.store(amount.to_bits(), Ordering::Relaxed);
    }

    pub fn low_pass(&self) -> f32 {
        f32::from_bits(self.lowpass_bits.load(Ordering::Relaxed))
    }

    pub fn cutoff_hz(&self) -> f32 {
        lowpass_cutoff(self.low_pass())
    }
}

/// Linear macro mapping from the 0..1 knob to a cutoff in Hz.
#[inline]
pub fn lowpass_cutoff(amount: f32) -> f32 {
    LOWPASS_MIN_HZ + amount.clamp(0.0, 1.0) * (LOWPASS_MAX_HZ - LOWPASS_MIN_HZ)
}

struct ChannelChain {
    shelf: BiquadEq,
    mud: BiquadEq,
    lowpass: SVFilter,
}

impl ChannelChain {
    fn new() -> Self {
        Self {
            shelf: BiquadEq::low_shelf(SHELF_FREQ, SHELF_GAIN_DB),
            mud: BiquadEq::peaking(MUD_FREQ, MUD_GAIN_DB, MUD_Q),
            lowpass: SVFilter::lowpass(LOWPASS_MAX_HZ),
        }
    }
}

pub struct MixBus {
    controls: Arc<BusControls>,
    channels: [ChannelChain; 2],
}

impl MixBus {
    pub fn new(controls: Arc<BusControls>) -> Self {
        Self {
            controls,
            channels: [ChannelChain::new(), ChannelChain::new()],
        }
    }

    /// Process one channel's block in place. Channels keep separate filter
    /// state; call with 0 for left and 1 for right.
    pub fn process_channel(&mut self, channel: usize, buffer: &mut [f32], sample_rate: f32) {
        let volume = self.controls.volume();
        let cutoff = self.controls.cutoff_hz();

        let chain = &mut self.channels[channel & 1];
        chain.shelf.render(buffer, sample_rate);
        chain.mud.render(buffer, sample_rate);
        for sample in buffer.iter_mut() {
            *sample = soft_clip(*sample, SATURATION_DRIVE);
        }
        chain.lowpass.set_cutoff(cutoff);
        chain.lowpass.render(buffer, sample_rate);
        for sample in buffer.iter_mut() {
            *sample *= volume;
        }
    }
}
