//! Painting Integration Tests
//!
//! Tests the complete painting flow including:
//! - Mask union semantics across arbitrary stamp sequences
//! - Preview accumulation
//! - Reload and clear resets
//! - Input before any source image is loaded

use inpaint_core::event::parse_script;
use inpaint_core::surface::{OPAQUE_BLACK, OPAQUE_WHITE};
use inpaint_core::{
    BrushRadius, CanvasRect, InputEvent, MaskingState, Point, PointerEvent, SourceImage, Stamp,
    StrokePhase,
};
use proptest::prelude::*;

fn png_source(name: &str) -> SourceImage {
    SourceImage::from_bytes(name, vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
        .expect("source")
}

fn loaded(width: u32, height: u32) -> MaskingState {
    let mut state = MaskingState::default();
    state
        .load_source(png_source("photo.png"), width, height)
        .expect("load");
    state
}

/// Apply a single press at each point, releasing in between.
fn dab_all(state: &mut MaskingState, points: &[(f32, f32)]) {
    let rect = CanvasRect::at_origin(600.0, 400.0);
    for &(x, y) in points {
        state.handle_pointer(&PointerEvent::down(x, y), &rect);
        state.handle_pointer(&PointerEvent::up(x, y), &rect);
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #[test]
    fn mask_is_union_of_stamps(
        points in prop::collection::vec((-20.0f32..80.0, -20.0f32..80.0), 0..12),
        radius in 5u32..=50,
    ) {
        let mut state = loaded(64, 64);
        state.set_brush_radius(radius).expect("radius");
        dab_all(&mut state, &points);

        let stamps: Vec<Stamp> = points
            .iter()
            .map(|&(x, y)| Stamp::new(Point::new(x, y), BrushRadius::new(radius).expect("radius")))
            .collect();

        let mask = state.compositor().expect("compositor").mask();
        for y in 0..64 {
            for x in 0..64 {
                let covered = stamps.iter().any(|s| s.covers(x, y));
                let expected = if covered { OPAQUE_WHITE } else { OPAQUE_BLACK };
                prop_assert_eq!(mask.get_pixel(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn preview_alpha_is_monotonic(repeats in 1usize..12, x in 0u32..32, y in 0u32..32) {
        let mut state = loaded(32, 32);
        let rect = CanvasRect::at_origin(32.0, 32.0);
        #[allow(clippy::cast_precision_loss)]
        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);

        let mut previous = 0u8;
        for _ in 0..repeats {
            state.handle_pointer(&PointerEvent::down(cx, cy), &rect);
            state.handle_pointer(&PointerEvent::up(cx, cy), &rect);
            let alpha = state
                .compositor()
                .and_then(|c| c.preview().get_pixel(x, y))
                .map_or(0, |p| p[3]);
            prop_assert!(alpha >= previous);
            prop_assert!(alpha > 0);
            previous = alpha;
        }
    }
}

// ============================================================================
// Lifecycle tests
// ============================================================================

#[test]
fn test_stamp_at_100_100_radius_10() {
    let mut state = loaded(600, 400);
    dab_all(&mut state, &[(100.0, 100.0)]);

    let mask = state.compositor().expect("compositor").mask();
    let disc = Stamp::new(Point::new(100.0, 100.0), BrushRadius::default());
    let mut white = 0;
    for y in 0..400 {
        for x in 0..600 {
            let pixel = mask.get_pixel(x, y).expect("in bounds");
            if disc.covers(x, y) {
                assert_eq!(pixel, OPAQUE_WHITE, "({x}, {y}) should be selected");
                white += 1;
            } else {
                assert_eq!(pixel, OPAQUE_BLACK, "({x}, {y}) should be untouched");
            }
        }
    }
    // Area of a radius-10 disc is ~314 pixels.
    assert!((300..=330).contains(&white), "unexpected disc area {white}");
}

#[test]
fn test_reload_discards_prior_strokes() {
    let mut state = loaded(600, 400);
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(200.0, 200.0), &rect);
    state.handle_pointer(&PointerEvent::moved(220.0, 210.0), &rect);

    state
        .load_source(png_source("other.png"), 600, 400)
        .expect("reload");

    assert_eq!(state.stroke_phase(), StrokePhase::Idle);
    assert_eq!(state.source().map(SourceImage::file_name), Some("other.png"));
    let compositor = state.compositor().expect("compositor");
    assert_eq!(compositor.mask().count_matching(OPAQUE_BLACK), 600 * 400);

    // A move straight after reload must not paint: the session is idle.
    assert_eq!(state.handle_pointer(&PointerEvent::moved(220.0, 210.0), &rect), 0);
}

#[test]
fn test_events_before_load_leave_no_trace() {
    let mut state = MaskingState::default();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    dab_all(&mut state, &[(10.0, 10.0), (300.0, 200.0)]);
    state.handle_pointer(&PointerEvent::down(5.0, 5.0), &rect);
    state.handle_pointer(&PointerEvent::moved(50.0, 50.0), &rect);
    state.clear();

    state
        .load_source(png_source("late.png"), 600, 400)
        .expect("load");
    state.clear();
    let compositor = state.compositor().expect("compositor");
    assert_eq!(compositor.mask().count_matching(OPAQUE_BLACK), 600 * 400);
    assert_eq!(state.stroke_phase(), StrokePhase::Idle);
}

#[test]
fn test_fast_drag_leaves_gaps_without_interpolation() {
    let rect = CanvasRect::at_origin(600.0, 400.0);
    let drag = [
        PointerEvent::down(50.0, 200.0),
        PointerEvent::moved(150.0, 200.0),
        PointerEvent::up(150.0, 200.0),
    ];

    let mut sparse = loaded(600, 400);
    let mut smooth = MaskingState::new(true);
    smooth
        .load_source(png_source("photo.png"), 600, 400)
        .expect("load");

    for event in &drag {
        sparse.handle_pointer(event, &rect);
        smooth.handle_pointer(event, &rect);
    }

    let gap = |state: &MaskingState| {
        state
            .compositor()
            .and_then(|c| c.mask().get_pixel(100, 200))
    };
    assert_eq!(gap(&sparse), Some(OPAQUE_BLACK));
    assert_eq!(gap(&smooth), Some(OPAQUE_WHITE));
}

#[test]
fn test_script_replay() {
    let script = r#"[
        {"type": "brush", "data": {"radius": 5}},
        {"type": "pointer", "data": {"phase": "down", "client_x": 30, "client_y": 30}},
        {"type": "pointer", "data": {"phase": "move", "client_x": 32, "client_y": 30}},
        {"type": "pointer", "data": {"phase": "up", "client_x": 32, "client_y": 30}}
    ]"#;

    let mut state = loaded(600, 400);
    let rect = CanvasRect::at_origin(600.0, 400.0);
    let events: Vec<InputEvent> = parse_script(script).expect("script");

    let mut stamps = 0;
    for event in &events {
        stamps += state.process_event(event, &rect).expect("event");
    }
    assert_eq!(stamps, 2);
    assert_eq!(state.brush_radius().get(), 5);
    assert_eq!(
        state.compositor().and_then(|c| c.mask().get_pixel(31, 30)),
        Some(OPAQUE_WHITE)
    );
}
