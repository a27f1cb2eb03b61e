use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = BoothConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, BoothConfig::default());
    assert_eq!(cfg.shots, 2);
    assert_eq!(cfg.filter, "None");
    assert_eq!(cfg.grab_retries, 1);
}

#[test]
fn partial_json_overrides_selected_fields() {
    let json = r##"{
        "shots": 4,
        "filter": "High Contrast",
        "timings": { "flash_ms": 300 },
        "output_dir": "out"
    }"##;
    let cfg = BoothConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.shots, 4);
    assert_eq!(cfg.filter, "High Contrast");
    assert_eq!(cfg.timings.flash_ms, 300);
    assert_eq!(cfg.timings.ready_ms, 1000);
    assert_eq!(cfg.output_dir, PathBuf::from("out"));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(BoothConfig::from_reader(r#"{ "shots": 5 }"#.as_bytes()).is_err());
    assert!(BoothConfig::from_reader(r#"{ "shots": 1 }"#.as_bytes()).is_err());
    assert!(BoothConfig::from_reader(r#"{ "filter": "Neon" }"#.as_bytes()).is_err());
    assert!(BoothConfig::from_reader(r#"{ "unknown_key": 1 }"#.as_bytes()).is_err());
    assert!(BoothConfig::from_reader("not json".as_bytes()).is_err());
}

#[test]
fn shot_count_validation_matches_selector() {
    for n in SHOT_COUNTS {
        assert!(validate_shot_count(n).is_ok());
    }
    assert!(validate_shot_count(0).is_err());
}

#[test]
fn missing_config_file_is_a_validation_error() {
    let err = BoothConfig::from_path("target/does-not-exist/booth.json").unwrap_err();
    assert!(err.to_string().contains("open booth config"));
}

#[test]
fn colors_are_written_and_read_as_hex() {
    let json = r##"{
        "collage": { "title_color": "#0a0b0c", "shadow_color": "#12121280" },
        "preview": { "placeholder": "#000" }
    }"##;
    let cfg = BoothConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.collage.title_color, Rgba8::opaque(0x0a, 0x0b, 0x0c));
    assert_eq!(cfg.collage.shadow_color, Rgba8::new(0x12, 0x12, 0x12, 0x80));
    assert_eq!(cfg.preview.placeholder, Rgba8::opaque(0, 0, 0));

    let written = serde_json::to_string(&BoothConfig::default()).unwrap();
    assert!(written.contains(r##""slot_fill":"#f3f4f6""##));
    assert_eq!(
        BoothConfig::from_reader(written.as_bytes()).unwrap(),
        BoothConfig::default()
    );

    let bad = r#"{ "collage": { "card_fill": "white" } }"#;
    assert!(BoothConfig::from_reader(bad.as_bytes()).is_err());
}

#[test]
fn oversized_collage_config_is_rejected_at_load() {
    let json = r#"{ "collage": { "shadow_margin": 2147483647 } }"#;
    assert!(matches!(
        BoothConfig::from_reader(json.as_bytes()),
        Err(BoothError::Validation(_))
    ));
}
