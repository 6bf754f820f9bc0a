use super::*;
use base64::Engine as _;
use std::io::Cursor;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![1u8, 2u8, 3u8, 255u8]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn image_spec_sniffs_format() {
    let spec = ImageSpec::from_bytes(png_bytes()).unwrap();
    assert_eq!(spec.format(), image::ImageFormat::Png);
    assert_eq!(spec.media_type(), "image/png");
    assert!(!spec.is_empty());
}

#[test]
fn image_spec_rejects_empty_and_unknown_payloads() {
    assert!(ImageSpec::from_bytes(Vec::new()).is_err());
    assert!(ImageSpec::from_bytes(b"definitely not an image".to_vec()).is_err());
}

#[test]
fn image_spec_decodes_base64_data_urls() {
    let png = png_bytes();
    let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));
    let spec = ImageSpec::from_data_url(&url).unwrap();
    assert_eq!(spec.bytes(), png.as_slice());

    assert!(ImageSpec::from_data_url("image/png;base64,AAAA").is_err());
    assert!(ImageSpec::from_data_url("data:image/png,rawtext").is_err());
    assert!(ImageSpec::from_data_url("data:image/png;base64,@@@").is_err());
}

#[test]
fn clones_share_the_payload() {
    let a = ImageSpec::from_bytes(png_bytes()).unwrap();
    let b = a.clone();
    assert_eq!(a.bytes().as_ptr(), b.bytes().as_ptr());
    assert_eq!(a, b);
}

#[test]
fn background_serializes_tagged() {
    let theme = Theme::new(AspectRatio::Portrait9x16, ColorSpec::PRESETS[1].into());
    let v = serde_json::to_value(&theme).unwrap();
    assert_eq!(v["aspect_ratio"], "9:16");
    assert_eq!(v["background"]["color"], "#f87171");

    let image = ImageSpec::from_bytes(png_bytes()).unwrap();
    let theme = Theme::new(AspectRatio::Square1x1, image.clone().into());
    let v = serde_json::to_value(&theme).unwrap();
    assert_eq!(v["background"]["image"]["media_type"], "image/png");
    assert_eq!(v["background"]["image"]["sha256"], image.sha256());
}

#[test]
fn default_theme_is_white_landscape() {
    let theme = Theme::default();
    assert_eq!(theme.aspect_ratio, AspectRatio::Landscape16x9);
    assert_eq!(theme.background, Background::Color(ColorSpec::WHITE));
}
