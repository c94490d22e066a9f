//! Integration tests for mask export (inpaint-renderer).
//!
//! Tests the paint → export → decode path at the widget's canvas size,
//! clear and reload resets, and the display composite.

use inpaint_core::surface::{OPAQUE_BLACK, OPAQUE_WHITE};
use inpaint_core::{
    BrushRadius, CanvasRect, MaskingState, Point, PointerEvent, SourceImage, Stamp, Surface,
};
use inpaint_renderer::image::decode_surface;
use inpaint_renderer::{ExportConfig, MaskChannels, MaskExporter};
use pretty_assertions::assert_eq;

/// Build a real, decodable PNG source of the given size and colour.
fn solid_png_source(width: u32, height: u32, color: [u8; 4]) -> SourceImage {
    let surface = Surface::new(width, height, color).expect("surface");
    let png = MaskExporter::with_defaults()
        .encode_preview(&surface)
        .expect("encode");
    SourceImage::from_bytes("solid.png", png).expect("source")
}

fn loaded_state() -> MaskingState {
    let mut state = MaskingState::default();
    state
        .load_source(solid_png_source(60, 40, [10, 120, 200, 255]), 600, 400)
        .expect("load");
    state
}

fn export_mask(state: &MaskingState) -> Surface {
    let (_, compositor) = state.export_inputs().expect("inputs");
    let artifact = MaskExporter::with_defaults()
        .encode_mask(compositor.mask())
        .expect("encode");
    assert_eq!(artifact.dimensions(), (600, 400));
    decode_surface(artifact.bytes()).expect("decode")
}

fn assert_all_black(mask: &Surface) {
    assert_eq!(mask.dimensions(), (600, 400));
    assert_eq!(mask.count_matching(OPAQUE_BLACK), 600 * 400);
}

// ==========================================================================
// End-to-end mask scenarios
// ==========================================================================

#[test]
fn test_single_stamp_exports_exact_disc() {
    let mut state = loaded_state();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(100.0, 100.0), &rect);
    state.handle_pointer(&PointerEvent::up(100.0, 100.0), &rect);

    let mask = export_mask(&state);
    let disc = Stamp::new(Point::new(100.0, 100.0), BrushRadius::new(10).expect("radius"));

    let mut mismatches = Vec::new();
    for y in 0..400 {
        for x in 0..600 {
            let expected = if disc.covers(x, y) {
                OPAQUE_WHITE
            } else {
                OPAQUE_BLACK
            };
            if mask.get_pixel(x, y) != Some(expected) {
                mismatches.push((x, y));
            }
        }
    }
    assert_eq!(mismatches, Vec::<(u32, u32)>::new());
    assert_eq!(mask.get_pixel(100, 100), Some(OPAQUE_WHITE));
    assert_eq!(mask.get_pixel(100, 111), Some(OPAQUE_BLACK));
}

#[test]
fn test_clear_then_export_is_all_black() {
    let mut state = loaded_state();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(300.0, 200.0), &rect);
    state.handle_pointer(&PointerEvent::moved(320.0, 220.0), &rect);
    state.handle_pointer(&PointerEvent::up(320.0, 220.0), &rect);

    state.clear();
    assert_all_black(&export_mask(&state));
}

#[test]
fn test_reload_then_export_is_all_black() {
    let mut state = loaded_state();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(50.0, 50.0), &rect);
    state.handle_pointer(&PointerEvent::moved(80.0, 60.0), &rect);

    state
        .load_source(solid_png_source(30, 30, [0, 0, 0, 255]), 600, 400)
        .expect("reload");
    assert_all_black(&export_mask(&state));
}

#[test]
fn test_events_before_load_then_clear_is_all_black() {
    let mut state = MaskingState::default();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(50.0, 50.0), &rect);
    state.handle_pointer(&PointerEvent::moved(80.0, 60.0), &rect);
    state.handle_pointer(&PointerEvent::up(80.0, 60.0), &rect);

    state
        .load_source(solid_png_source(60, 40, [255, 0, 0, 255]), 600, 400)
        .expect("load");
    state.clear();
    assert_all_black(&export_mask(&state));
}

#[test]
fn test_luma_and_rgba_masks_agree() {
    let mut state = loaded_state();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.set_brush_radius(50).expect("radius");
    state.handle_pointer(&PointerEvent::down(580.0, 390.0), &rect);

    let (_, compositor) = state.export_inputs().expect("inputs");
    let rgba = MaskExporter::with_defaults()
        .encode_mask(compositor.mask())
        .expect("rgba");
    let luma = MaskExporter::new(ExportConfig {
        mask_channels: MaskChannels::Luma,
        ..Default::default()
    })
    .encode_mask(compositor.mask())
    .expect("luma");

    assert!(luma.bytes().len() < rgba.bytes().len() * 2);
    assert_eq!(
        decode_surface(rgba.bytes()).expect("decode rgba"),
        decode_surface(luma.bytes()).expect("decode luma")
    );
}

// ==========================================================================
// Display composite
// ==========================================================================

#[test]
fn test_display_composite_overlays_highlight() {
    let mut state = loaded_state();
    let rect = CanvasRect::at_origin(600.0, 400.0);
    state.handle_pointer(&PointerEvent::down(300.0, 200.0), &rect);

    let (source, compositor) = state.export_inputs().expect("inputs");
    let png = MaskExporter::with_defaults()
        .compose_display(source, compositor.preview())
        .expect("compose");
    let display = decode_surface(&png).expect("decode");
    assert_eq!(display.dimensions(), (600, 400));

    // Unpainted area shows the source colour.
    let plain = display.get_pixel(10, 10).expect("pixel");
    assert_eq!(plain[3], 255);
    assert!(plain[2] > plain[0]);

    // Painted area is lighter than the source underneath.
    let highlighted = display.get_pixel(300, 200).expect("pixel");
    assert!(highlighted[0] > plain[0] + 50, "{highlighted:?} vs {plain:?}");
}

#[test]
fn test_display_composite_letterboxes_wide_source() {
    let mut state = MaskingState::default();
    state
        .load_source(solid_png_source(120, 20, [0, 255, 0, 255]), 600, 400)
        .expect("load");

    let (source, compositor) = state.export_inputs().expect("inputs");
    let png = MaskExporter::with_defaults()
        .compose_display(source, compositor.preview())
        .expect("compose");
    let display = decode_surface(&png).expect("decode");

    // 120x20 fits as 600x100 centred vertically.
    assert_eq!(display.get_pixel(300, 10), Some([0, 0, 0, 0]));
    let centre = display.get_pixel(300, 200).expect("pixel");
    assert!(centre[1] > 250 && centre[3] > 250, "{centre:?}");
}
