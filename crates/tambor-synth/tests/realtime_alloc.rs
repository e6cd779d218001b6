//! Allocation checks for the render path.
//!
//! A counting global allocator is armed only around `render_block`, so setup
//! and assertions are free to allocate.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::collections::VecDeque;
use tambor_synth::{
    DrumKind, DrumVoice, InstrumentKind, NamedTable, SampleSelection, SettingsPatch, Voice,
    VoiceMessage, VoiceSlot, WavetableBank,
};

struct Counting;

// Counted per thread.
thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
    static ALLOCS: Cell<usize> = const { Cell::new(0) };
    static FREES: Cell<usize> = const { Cell::new(0) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    if ARMED.with(Cell::get) {
        counter.with(|c| c.set(c.get() + 1));
    }
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump(&ALLOCS);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        bump(&FREES);
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

/// Run `f` with the allocator armed; returns `(allocations, frees)`.
fn counted(f: impl FnOnce()) -> (usize, usize) {
    ALLOCS.with(|c| c.set(0));
    FREES.with(|c| c.set(0));
    ARMED.with(|a| a.set(true));
    f();
    ARMED.with(|a| a.set(false));
    (ALLOCS.with(Cell::get), FREES.with(Cell::get))
}

#[test]
fn named_selection_update_does_not_allocate() {
    let mut bank = WavetableBank::new(44100.0);
    bank.insert(DrumKind::Kick, NamedTable::new("808-long", vec![0.3f32; 512]));
    bank.insert(DrumKind::Kick, NamedTable::new("909-tight", vec![0.6f32; 512]));
    let settings = InstrumentKind::Wavetable(DrumKind::Kick).default_settings();
    let voice = DrumVoice::wavetable(DrumKind::Kick, &bank, settings, 44100.0);
    let mut slot = VoiceSlot::new(voice);

    let patch = SettingsPatch::new().selected_sample(SampleSelection::Name("909-tight".into()));
    let mut queue = VecDeque::with_capacity(4);
    queue.push_back(VoiceMessage::UpdateSettings(patch));
    queue.push_back(VoiceMessage::Trigger {
        offset: 8,
        velocity: 1.0,
        pitch: DrumKind::Kick.base_pitch(),
        adsr: None,
    });
    let mut out = [0.0f32; 64];

    let (allocs, frees) = counted(|| slot.render_block(&mut out, &mut queue));
    assert_eq!(allocs, 0, "allocations during render_block");
    assert_eq!(frees, 0, "frees during render_block");

    assert_eq!(
        slot.voice().settings().selected_sample,
        SampleSelection::Name("909-tight".into())
    );
    assert_eq!(out[8], 0.6);
}

#[test]
fn block_rendering_does_not_allocate() {
    let voice = DrumVoice::with_defaults(InstrumentKind::Snare, 44100.0);
    let mut slot = VoiceSlot::new(voice);
    let mut queue = VecDeque::with_capacity(4);
    queue.push_back(VoiceMessage::UpdateSettings(SettingsPatch::new().decay(0.3)));
    queue.push_back(VoiceMessage::Trigger {
        offset: 0,
        velocity: 0.8,
        pitch: 60.0,
        adsr: None,
    });
    let mut out = [0.0f32; 256];

    let (allocs, frees) = counted(|| {
        for _ in 0..16 {
            slot.render_block(&mut out, &mut queue);
        }
    });
    assert_eq!((allocs, frees), (0, 0));
    assert!(slot.voice().is_active());
}
