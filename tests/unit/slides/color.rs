use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c = ColorSpec::parse("#F87171").unwrap();
    assert_eq!(c, ColorSpec::rgb(0xf8, 0x71, 0x71));

    let c = ColorSpec::parse("0000ff80").unwrap();
    assert_eq!(c, ColorSpec::rgba(0, 0, 255, 128));
}

#[test]
fn rejects_malformed_hex() {
    assert!(ColorSpec::parse("#fff").is_err());
    assert!(ColorSpec::parse("#gg0000").is_err());
    assert!(ColorSpec::parse("#ffé000").is_err());
    assert!(ColorSpec::parse("").is_err());
}

#[test]
fn serde_uses_hex_strings() {
    let c: ColorSpec = serde_json::from_value(json!("#60a5fa")).unwrap();
    assert_eq!(c, ColorSpec::PRESETS[2]);
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#60a5fa"));

    let translucent = ColorSpec::rgba(1, 2, 3, 4);
    assert_eq!(translucent.to_hex(), "#01020304");
}

#[test]
fn ffmpeg_form_drops_alpha() {
    assert_eq!(ColorSpec::rgba(0x34, 0xd3, 0x99, 0x10).to_ffmpeg_rgb(), "0x34D399");
}

#[test]
fn presets_start_with_white() {
    assert_eq!(ColorSpec::PRESETS[0], ColorSpec::WHITE);
    assert_eq!(ColorSpec::default(), ColorSpec::WHITE);
}
