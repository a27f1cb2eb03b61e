use super::*;
use crate::camera::source::{SyntheticSource, UnavailableSource};
use crate::filters::registry::FilterRegistry;

fn small_config() -> PreviewConfig {
    PreviewConfig {
        width: 6,
        height: 4,
        ..PreviewConfig::default()
    }
}

#[test]
fn unavailable_camera_degrades_to_placeholder() {
    let mut preview = LivePreview::new(small_config());
    let status = preview.attach_stream(Box::new(UnavailableSource::default()));
    assert_eq!(*status, PreviewStatus::Placeholder);
    assert!(!preview.is_live());

    let frame = preview.render_frame().unwrap();
    assert_eq!((frame.width, frame.height), (6, 4));
    assert_eq!(frame.pixel(0, 0), [0x1f, 0x1f, 0x1f, 255]);
}

#[test]
fn live_frames_are_mirrored() {
    let mut preview = LivePreview::new(small_config());
    preview.attach_stream(Box::new(SyntheticSource::new(8, 8)));
    assert!(preview.is_live());

    let frame = preview.render_frame().unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert_eq!(frame.pixel(7, 0), [250, 250, 250, 255]);
}

#[test]
fn at_most_one_overlay_follows_the_filter() {
    let registry = FilterRegistry::builtin().unwrap();
    let mut preview = LivePreview::new(small_config());
    assert!(preview.overlay().is_none());

    preview.apply_filter(registry.resolve("Vignette").unwrap());
    assert_eq!(preview.overlay(), Some(&Vignette::preview_overlay()));
    preview.apply_filter(registry.resolve("Vignette").unwrap());
    assert!(preview.overlay().is_some());

    preview.apply_filter(registry.resolve("Sepia").unwrap());
    assert!(preview.overlay().is_none());
    assert_eq!(preview.filter().map(|f| f.name.as_str()), Some("Sepia"));
}

#[test]
fn vignette_darkens_preview_corners() {
    let registry = FilterRegistry::builtin().unwrap();
    let mut preview = LivePreview::new(small_config());
    preview.attach_stream(Box::new(SyntheticSource::new(40, 40)));
    let plain = preview.render_frame().unwrap();

    preview.apply_filter(registry.resolve("Vignette").unwrap());
    let dark = preview.render_frame().unwrap();
    // Green and blue do not drift between synthetic reads.
    assert_eq!(dark.pixel(20, 20)[1], plain.pixel(20, 20)[1]);
    assert!(dark.pixel(39, 39)[1] < plain.pixel(39, 39)[1]);
}

#[test]
fn release_is_idempotent() {
    let mut preview = LivePreview::new(small_config());
    preview.attach_stream(Box::new(SyntheticSource::new(4, 4)));
    assert!(preview.source_mut().is_some());
    preview.release_stream();
    preview.release_stream();
    assert!(!preview.source_mut().unwrap().is_open());
    assert_eq!(*preview.status(), PreviewStatus::Placeholder);

    let frame = preview.render_frame().unwrap();
    assert_eq!((frame.width, frame.height), (6, 4));
}

#[test]
fn reopen_restores_the_live_stream() {
    let mut preview = LivePreview::new(small_config());
    assert_eq!(*preview.reopen_stream(), PreviewStatus::Placeholder);

    preview.attach_stream(Box::new(SyntheticSource::new(4, 4)));
    preview.release_stream();
    assert!(!preview.is_live());
    assert!(preview.reopen_stream() != &PreviewStatus::Placeholder);
    assert!(preview.is_live());
}
