//! Control messages delivered to a voice from outside the audio thread.
//!
//! A control thread pushes [`VoiceMessage`]s into a lock-free queue (an
//! `rtrb` ring buffer behind the `rtrb` feature); the audio thread drains it
//! at the start of every block through [`VoiceSlot::render_block`]. Settings
//! updates take effect at the block boundary; triggers take effect at their
//! sample offset inside the block, so timing is sample accurate regardless of
//! block size.

use crate::settings::{Adsr, SettingsPatch};
use crate::voice::Voice;
use alloc::collections::VecDeque;
#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Message for a single voice.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceMessage {
    /// Start a note `offset` samples after the start of the next block.
    Trigger {
        /// Sample offset from the start of the block that drains it.
        offset: u32,
        /// Linear velocity in `[0, 1]`.
        velocity: f32,
        /// MIDI pitch.
        pitch: f32,
        /// Per-note envelope override.
        adsr: Option<Adsr>,
    },
    /// Merge a partial settings update at the next block boundary.
    UpdateSettings(SettingsPatch),
}

impl VoiceMessage {
    /// Trigger at the start of the next block without an override.
    pub fn trigger(velocity: f32, pitch: f32) -> Self {
        Self::Trigger {
            offset: 0,
            velocity,
            pitch,
            adsr: None,
        }
    }
}

/// Source of control messages polled from the audio thread.
pub trait MessageReceiver {
    /// Next queued message, if any. Must not block.
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        self.pop_front()
    }
}

/// Triggers a slot can hold for future samples.
pub const MAX_PENDING_TRIGGERS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTrigger {
    offset: u32,
    velocity: f32,
    pitch: f32,
    adsr: Option<Adsr>,
}

const NO_TRIGGER: PendingTrigger = PendingTrigger {
    offset: 0,
    velocity: 0.0,
    pitch: 0.0,
    adsr: None,
};

/// A voice plus the triggers scheduled for it.
///
/// Offsets past the end of a block carry over into later blocks. When more
/// than [`MAX_PENDING_TRIGGERS`] are waiting, further triggers fire at the
/// start of the current block instead of being lost.
#[derive(Debug, Clone)]
pub struct VoiceSlot<V> {
    voice: V,
    pending: [PendingTrigger; MAX_PENDING_TRIGGERS],
    pending_len: usize,
}

impl<V: Voice> VoiceSlot<V> {
    /// Wrap a voice.
    pub fn new(voice: V) -> Self {
        Self {
            voice,
            pending: [NO_TRIGGER; MAX_PENDING_TRIGGERS],
            pending_len: 0,
        }
    }

    /// The hosted voice.
    pub fn voice(&self) -> &V {
        &self.voice
    }

    /// The hosted voice, mutably.
    pub fn voice_mut(&mut self) -> &mut V {
        &mut self.voice
    }

    /// Unwrap the voice, discarding scheduled triggers.
    pub fn into_inner(self) -> V {
        self.voice
    }

    /// Number of triggers waiting for a later sample.
    pub fn pending(&self) -> usize {
        self.pending_len
    }

    /// Drain `rx`, then render `out` with every trigger at its offset.
    pub fn render_block<R>(&mut self, out: &mut [f32], rx: &mut R)
    where
        R: MessageReceiver + ?Sized,
    {
        while let Some(message) = rx.pop() {
            match message {
                VoiceMessage::UpdateSettings(patch) => self.voice.update_settings(patch),
                VoiceMessage::Trigger {
                    offset,
                    velocity,
                    pitch,
                    adsr,
                } => self.schedule(PendingTrigger {
                    offset,
                    velocity,
                    pitch,
                    adsr,
                }),
            }
        }

        let len = out.len();
        let mut pos = 0;
        loop {
            let next = self.next_due(len).unwrap_or(len);
            self.voice.process_block(&mut out[pos..next]);
            pos = next;
            if pos >= len {
                break;
            }
            self.fire_due(pos as u32);
        }

        let elapsed = len as u32;
        for pending in &mut self.pending[..self.pending_len] {
            pending.offset -= elapsed;
        }
    }

    fn schedule(&mut self, trigger: PendingTrigger) {
        if self.pending_len < MAX_PENDING_TRIGGERS {
            self.pending[self.pending_len] = trigger;
            self.pending_len += 1;
        } else {
            self.voice
                .trigger(trigger.velocity, trigger.pitch, trigger.adsr);
        }
    }

    /// Earliest pending offset inside a block of `len` samples.
    fn next_due(&self, len: usize) -> Option<usize> {
        self.pending[..self.pending_len]
            .iter()
            .map(|p| p.offset as usize)
            .filter(|&offset| offset < len)
            .min()
    }

    /// Fire every trigger at `offset` in arrival order and drop it.
    fn fire_due(&mut self, offset: u32) {
        let mut kept = 0;
        for i in 0..self.pending_len {
            let pending = self.pending[i];
            if pending.offset == offset {
                self.voice
                    .trigger(pending.velocity, pending.pitch, pending.adsr);
            } else {
                self.pending[kept] = pending;
                kept += 1;
            }
        }
        self.pending_len = kept;
    }
}
