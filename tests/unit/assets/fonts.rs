use super::*;

#[test]
fn missing_font_file_is_a_font_load_failure() {
    let err = load_font_file(Path::new("target/no-such-dir/FleurDeLeah.ttf")).unwrap_err();
    assert!(matches!(err, BoothError::FontLoadFailed(_)));
}

#[test]
fn truncated_font_file_is_rejected() {
    let dir = std::path::PathBuf::from("target").join("unit_fonts");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tiny.ttf");
    std::fs::write(&path, b"ab").unwrap();
    assert!(matches!(
        load_font_file(&path),
        Err(BoothError::FontLoadFailed(_))
    ));
}

#[test]
fn broken_configured_font_falls_back_to_system_or_none() {
    let resolved = resolve_title_font(Some(Path::new("target/no-such-dir/x.ttf")));
    if let Some(font) = resolved {
        assert!(!font.bytes.is_empty());
        assert!(!font.origin.contains("no-such-dir"));
    }
}

#[test]
fn garbage_bytes_do_not_register() {
    let mut engine = TextLayoutEngine::new();
    let garbage = TitleFont {
        origin: "garbage".to_string(),
        bytes: Arc::new(b"not a font".to_vec()),
    };
    assert!(matches!(
        engine.register_font(&garbage),
        Err(BoothError::FontLoadFailed(_))
    ));
    assert_eq!(engine.registrations(), 0);
}

#[test]
fn non_positive_sizes_are_rejected() {
    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8::default();
    assert!(engine.layout_line("x", "serif", 0.0, brush).is_err());
    assert!(engine.layout_line("x", "serif", f32::NAN, brush).is_err());
}

#[test]
fn system_font_lays_out_a_date_line() {
    let Some(font) = system_fallback_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let family = engine.register_font(&font).unwrap();
    let layout = engine
        .layout_line("06-Jul-2025", &family, 26.0, TextBrushRgba8::default())
        .unwrap();
    assert!(layout.width() > 0.0);
    assert!(layout.height() > 0.0);
    assert_eq!(engine.registrations(), 1);
}
