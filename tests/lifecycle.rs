//! End-to-end lifecycle scenarios through the public API.
//!
//! Uses a hand-cranked scheduler to show that nothing depends on
//! [`FrameLoop`] itself, only on the [`FrameScheduler`] seam.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use decoder_text::{
    CharacterState, DecoderConfig, DecoderText, DecoderTextProps, FrameCallback, FrameControl,
    FrameLoop, FrameScheduler, GlyphSet, MemorySink, Phase, PropValue, RevealState, SubscriptionId,
    Timeline, decoder_text,
};
use spark_signals::signal;

const FRAME: Duration = Duration::from_micros(16_667);

/// Scheduler the test fires by hand.
#[derive(Default)]
struct ManualScheduler {
    callbacks: RefCell<BTreeMap<u64, FrameCallback>>,
    next: RefCell<u64>,
}

impl ManualScheduler {
    fn fire(&self, dt: Duration) {
        let due = std::mem::take(&mut *self.callbacks.borrow_mut());
        for (id, mut callback) in due {
            if callback(dt) == FrameControl::Continue {
                self.callbacks.borrow_mut().insert(id, callback);
            }
        }
    }

    fn pending(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId {
        let mut next = self.next.borrow_mut();
        *next += 1;
        self.callbacks.borrow_mut().insert(*next, callback);
        SubscriptionId::from_raw(*next)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.borrow_mut().remove(&id.as_raw()).is_some()
    }
}

#[test_log::test]
fn hi_decodes_within_200_frames_on_any_scheduler() {
    let scheduler = Rc::new(ManualScheduler::default());
    let sink = MemorySink::new();
    let mut decoder = DecoderText::new(scheduler.clone(), sink.clone(), DecoderConfig::default());

    decoder.start("Hi");
    let mut frames = 0;
    while scheduler.pending() > 0 && frames < 1000 {
        scheduler.fire(FRAME);
        frames += 1;
    }

    assert!(frames < 200, "settled after {frames} frames");
    assert_eq!(decoder.phase(), Phase::Settled);
    assert_eq!(sink.display_text(), "Hi");
}

#[test_log::test]
fn settled_run_ignores_further_ticks() {
    let scheduler = Rc::new(ManualScheduler::default());
    let sink = MemorySink::new();
    let mut decoder = DecoderText::new(scheduler.clone(), sink.clone(), DecoderConfig::default());

    decoder.start("done");
    while scheduler.pending() > 0 {
        scheduler.fire(FRAME);
    }
    let emitted = sink.frame_count();
    let progress = decoder.progress();

    for _ in 0..50 {
        scheduler.fire(FRAME);
    }
    assert_eq!(sink.frame_count(), emitted);
    assert_eq!(decoder.progress(), progress);
}

#[test_log::test]
fn restart_abc_to_xy() {
    let frames = FrameLoop::new();
    let sink = MemorySink::new();
    let mut decoder =
        DecoderText::new(Rc::new(frames.clone()), sink.clone(), DecoderConfig::default())
            .with_seed(42);

    decoder.start("ABC");
    while decoder.progress() < 1.5 {
        frames.tick(FRAME);
    }
    assert_eq!(decoder.phase(), Phase::Decoding);

    decoder.start("XY");
    while !frames.is_idle() {
        frames.tick(FRAME);
    }

    assert_eq!(
        sink.display(),
        RevealState::from_cells(vec![
            CharacterState::Resolved('X'),
            CharacterState::Resolved('Y'),
        ])
    );
    assert!(!sink.display_text().contains('C'));
}

#[test_log::test]
fn linear_timeline_reveals_one_character_per_step() {
    let frames = FrameLoop::new();
    let sink = MemorySink::new();
    let config = DecoderConfig::default().with_timeline(Timeline::Linear {
        char_ms: 100.0,
        fps: 0,
    });
    let mut decoder = DecoderText::new(Rc::new(frames.clone()), sink.clone(), config);

    decoder.start("abcd");
    for _ in 0..10 {
        frames.tick(Duration::from_millis(25));
    }
    // 250ms at 100ms per character
    assert_eq!(decoder.reveal().resolved_count(), 2);

    while !frames.is_idle() {
        frames.tick(Duration::from_millis(25));
    }
    assert_eq!(sink.display_text(), "abcd");
}

#[test_log::test]
fn config_file_drives_the_effect() {
    let config = DecoderConfig::from_toml_str(
        r#"
        delay_ms = 50.0
        glyphs = "latin"

        [timeline]
        mode = "spring"
        mass = 1.0
        tension = 170.0
        friction = 26.0
        "#,
    )
    .unwrap();

    let frames = FrameLoop::new();
    let sink = MemorySink::new();
    let mut decoder = DecoderText::new(Rc::new(frames.clone()), sink.clone(), config);
    decoder.start("toml");
    assert_eq!(decoder.phase(), Phase::Delaying);

    while !frames.is_idle() {
        frames.tick(FRAME);
    }
    let latin = GlyphSet::latin();
    for frame in sink.frames() {
        for cell in frame.state.iter().filter(|c| c.is_noise()) {
            assert!(latin.contains(cell.value()));
        }
    }
    assert_eq!(sink.display_text(), "toml");
}

#[test_log::test]
fn reactive_primitive_full_lifecycle() {
    let frames = FrameLoop::new();
    let sink = MemorySink::new();
    let text = signal("first".to_string());
    let start = signal(true);

    let cleanup = decoder_text(
        Rc::new(frames.clone()),
        sink.clone(),
        DecoderTextProps {
            text: text.clone().into(),
            start: start.clone().into(),
            reduce_motion: Some(PropValue::Static(false)),
            seed: Some(3),
            ..Default::default()
        },
    );

    while !frames.is_idle() {
        frames.tick(FRAME);
    }
    assert_eq!(sink.display_text(), "first");

    start.set(false);
    assert!(sink.display().is_empty());

    text.set("second".to_string());
    assert!(frames.is_idle());

    start.set(true);
    while !frames.is_idle() {
        frames.tick(FRAME);
    }
    assert_eq!(sink.display_text(), "second");
    assert!(sink.frames().iter().all(|f| f.label.chars().count() == f.state.len()));

    cleanup();
}

#[test_log::test]
fn extreme_spring_configs_still_finish() {
    for toml in [
        "[timeline]\nmode = \"spring\"\nmass = 0.05",
        "[timeline]\nmode = \"spring\"\nfriction = 0.0",
        "[timeline]\nmode = \"spring\"\nmass = 0.0001\ntension = 10000.0\nfriction = 0.1",
    ] {
        let config = DecoderConfig::from_toml_str(toml).unwrap();
        let frames = FrameLoop::new();
        let sink = MemorySink::new();
        let mut decoder = DecoderText::new(Rc::new(frames.clone()), sink.clone(), config);

        decoder.start("Hi");
        let mut ticks = 0;
        while !frames.is_idle() && ticks < 1000 {
            frames.tick(FRAME);
            ticks += 1;
        }

        assert_eq!(decoder.phase(), Phase::Settled, "stuck with {toml:?}");
        assert_eq!(sink.display_text(), "Hi");
    }
}
