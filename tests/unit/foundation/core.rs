use super::*;

#[test]
fn hex_colors_parse_in_all_widths() {
    assert_eq!(Rgba8::from_hex("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex("#7e22ce").unwrap(),
        Rgba8::opaque(0x7e, 0x22, 0xce)
    );
    assert_eq!(
        Rgba8::from_hex("#12121280").unwrap(),
        Rgba8::new(0x12, 0x12, 0x12, 0x80)
    );
    assert!(Rgba8::from_hex("7e22ce").is_err());
    assert!(Rgba8::from_hex("#7e22c").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn frame_length_is_validated() {
    assert!(RgbaFrame::new(2, 2, vec![0; 16]).is_ok());
    assert!(RgbaFrame::new(2, 2, vec![0; 15]).is_err());
}

#[test]
fn mirror_swaps_columns_and_is_an_involution() {
    let mut f = RgbaFrame::new(
        3,
        1,
        vec![1, 1, 1, 255, 2, 2, 2, 255, 3, 3, 3, 255],
    )
    .unwrap();
    let original = f.clone();
    f.mirror_horizontal();
    assert_eq!(f.pixel(0, 0), [3, 3, 3, 255]);
    assert_eq!(f.pixel(1, 0), [2, 2, 2, 255]);
    assert_eq!(f.pixel(2, 0), [1, 1, 1, 255]);
    f.mirror_horizontal();
    assert_eq!(f, original);
}

#[test]
fn pixel_reads_clamp_to_border() {
    let f = RgbaFrame::filled(2, 2, Rgba8::opaque(9, 8, 7));
    assert_eq!(f.pixel(10, 10), [9, 8, 7, 255]);
}

#[test]
fn hex_output_omits_alpha_when_opaque() {
    assert_eq!(Rgba8::opaque(0x7e, 0x22, 0xce).to_hex(), "#7e22ce");
    assert_eq!(Rgba8::new(0, 0, 0, 0x80).to_hex(), "#00000080");
    let c = Rgba8::new(1, 2, 3, 4);
    assert_eq!(Rgba8::try_from(c.to_hex()).unwrap(), c);
}
