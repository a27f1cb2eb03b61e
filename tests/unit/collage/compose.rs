use super::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 6).unwrap()
}

fn solid_frame(w: u32, h: u32, c: Rgba8) -> ImageFrame {
    encode_png(&RgbaFrame::filled(w, h, c)).unwrap()
}

fn center(rect: crate::foundation::core::Rect) -> (u32, u32) {
    let c = rect.center();
    (c.x as u32, c.y as u32)
}

#[test]
fn title_uses_day_month_year() {
    assert_eq!(format_title_date(date()), "06-Jul-2025");
    let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(format_title_date(d), "31-Dec-2024");
}

#[test]
fn two_frames_make_a_540px_card() {
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let red = Rgba8::opaque(255, 0, 0);
    let frames = vec![solid_frame(64, 48, red), solid_frame(48, 64, red)];
    let collage = composer.compose(&frames, date()).unwrap();
    assert_eq!((collage.image.width, collage.image.height), (360, 540));
    assert_eq!(collage.title, "06-Jul-2025");

    let raster = collage.image.decode().unwrap();
    assert_eq!(raster.pixel(0, 0)[3], 0);
    assert_eq!(raster.pixel(100, 40), [255, 255, 255, 255]);
    for i in 0..2 {
        let (x, y) = center(composer.layout().slot_rect(i));
        let [r, g, b, a] = raster.pixel(x, y);
        assert!(r > 200 && g < 40 && b < 40 && a == 255, "slot {i}: {r},{g},{b},{a}");
    }
}

#[test]
fn shadow_bleeds_just_outside_the_card() {
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let raster = composer.compose(&[], date()).unwrap().image.decode().unwrap();
    assert!(raster.pixel(18, 80)[3] > 0);
    assert_eq!(raster.pixel(2, 80)[3], 0);
}

#[test]
fn failed_frame_leaves_only_its_slot_fill() {
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let blue = Rgba8::opaque(0, 0, 255);
    let frames = vec![
        solid_frame(32, 32, blue),
        ImageFrame::from_encoded(32, 32, b"corrupt".to_vec()),
        solid_frame(32, 32, blue),
    ];
    let collage = composer.compose(&frames, date()).unwrap();
    assert_eq!(collage.image.height, CollageLayout::default().canvas(3).height);

    let raster = collage.image.decode().unwrap();
    let slot_fill = [0xf3, 0xf4, 0xf6, 255];
    let (x1, y1) = center(composer.layout().slot_rect(1));
    assert_eq!(raster.pixel(x1, y1), slot_fill);
    for i in [0, 2] {
        let (x, y) = center(composer.layout().slot_rect(i));
        assert!(raster.pixel(x, y)[2] > 200);
    }
}

#[test]
fn empty_session_renders_title_only_card() {
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let collage = composer.compose(&[], date()).unwrap();
    assert_eq!((collage.image.width, collage.image.height), (360, 164));
}

#[test]
fn every_call_renders_a_fresh_image() {
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let frames = vec![solid_frame(8, 8, Rgba8::WHITE); 2];
    let a = composer.compose(&frames, date()).unwrap();
    let b = composer.compose(&frames, date()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn system_font_draws_title_glyphs() {
    let Some(font) = crate::assets::fonts::system_fallback_font() else {
        return;
    };
    let layout = CollageLayout::default();
    let mut plain = CollageComposer::new(layout.clone(), None).unwrap();
    let mut titled = CollageComposer::new(layout, Some(font)).unwrap();
    assert!(titled.has_title_font());

    let a = plain.compose(&[], date()).unwrap().image.decode().unwrap();
    let b = titled.compose(&[], date()).unwrap().image.decode().unwrap();
    let differs = (50..100).any(|y| (100..260).any(|x| a.pixel(x, y) != b.pixel(x, y)));
    assert!(differs);
}

#[test]
fn invalid_layout_is_rejected() {
    let bad = CollageLayout {
        photo_height: 0,
        ..CollageLayout::default()
    };
    assert!(CollageComposer::new(bad, None).is_err());
}

#[test]
fn title_font_is_registered_once_across_composes() {
    let Some(font) = crate::assets::fonts::system_fallback_font() else {
        return;
    };
    let mut composer = CollageComposer::new(CollageLayout::default(), Some(font)).unwrap();
    for _ in 0..3 {
        composer.compose(&[], date()).unwrap();
    }
    assert_eq!(composer.text.registrations(), 1);
}

#[test]
fn unusable_title_font_leaves_the_title_blank() {
    let garbage = TitleFont {
        origin: "garbage".to_string(),
        bytes: Arc::new(vec![0u8; 64]),
    };
    let mut composer = CollageComposer::new(CollageLayout::default(), Some(garbage)).unwrap();
    assert!(!composer.has_title_font());
    assert!(composer.compose(&[], date()).is_ok());
}

#[test]
fn too_many_frames_fail_as_composition_instead_of_panicking() {
    let broken = ImageFrame::from_encoded(4, 4, b"nope".to_vec());
    let mut composer = CollageComposer::new(CollageLayout::default(), None).unwrap();
    let err = composer.compose(&vec![broken; 400], date()).unwrap_err();
    assert!(matches!(err, BoothError::Composition(_)));
}
