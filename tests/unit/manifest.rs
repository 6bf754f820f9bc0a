use super::*;
use base64::Engine as _;

fn png_data_url() -> String {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(out.into_inner())
    )
}

#[test]
fn defaults_fill_missing_fields() {
    let m = BatchManifest::from_json(
        r#"{ "rows": [ { "title": "Intro", "content": "Welcome" } ] }"#,
        Path::new("."),
    )
    .unwrap();
    assert_eq!(m.count, 1);
    assert_eq!(m.policy, RowPolicy::AllOrNothing);
    assert_eq!(m.theme, Theme::default());
    assert_eq!(m.rows.get(0).unwrap().duration.get(), 30);
    assert_eq!(m.rows.rows().len(), MAX_ROWS);
}

#[test]
fn full_manifest() {
    let m = BatchManifest::from_json(
        r##"{
            "count": 2,
            "policy": "skip_incomplete",
            "theme": { "aspect_ratio": "9:16", "background": { "color": "#60a5fa" } },
            "rows": [
                { "title": "Intro", "content": "Welcome", "duration_secs": 12 },
                { "title": "", "content": "" },
                { "title": "Body", "content": "Main point" }
            ]
        }"##,
        Path::new("."),
    )
    .unwrap();
    assert_eq!(m.count, 2);
    assert_eq!(m.policy, RowPolicy::SkipIncomplete);
    assert_eq!(m.theme.aspect_ratio, AspectRatio::Portrait9x16);
    assert_eq!(
        m.theme.background,
        Background::Color(ColorSpec::rgb(0x60, 0xa5, 0xfa))
    );

    let plan = m.plan().unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.specs()[0].duration().get(), 12);
}

#[test]
fn image_background_from_data_url() {
    let json = serde_json::json!({
        "theme": { "background": { "image": png_data_url() } },
        "rows": [ { "title": "A", "content": "B" } ]
    })
    .to_string();
    let m = BatchManifest::from_json(&json, Path::new(".")).unwrap();
    match &m.theme.background {
        Background::Image(img) => assert_eq!(img.media_type(), "image/png"),
        other => panic!("expected image background, got {other:?}"),
    }
}

#[test]
fn missing_image_file_is_an_error() {
    let err = BatchManifest::from_json(
        r#"{ "theme": { "background": { "image": "nope.png" } }, "rows": [] }"#,
        Path::new("/nonexistent-dir"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("nope.png"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = BatchManifest::from_json("{ rows: }", Path::new(".")).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn bad_values_are_rejected() {
    for json in [
        r#"{ "rows": [ { "title": "A", "content": "B", "duration_secs": 5 } ] }"#,
        r#"{ "theme": { "aspect_ratio": "2:1" }, "rows": [] }"#,
        r#"{ "theme": { "background": { "color": "blue" } }, "rows": [] }"#,
        r#"{ "rows": [], "extra": true }"#,
    ] {
        let err = BatchManifest::from_json(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, ReelError::Serde(_)), "{json}: {err}");
    }
}

#[test]
fn too_many_rows() {
    let rows: Vec<_> = (0..11)
        .map(|i| serde_json::json!({ "title": format!("T{i}"), "content": "c" }))
        .collect();
    let json = serde_json::json!({ "rows": rows }).to_string();
    let err = BatchManifest::from_json(&json, Path::new(".")).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn count_override() {
    let m = BatchManifest::from_json(
        r#"{ "rows": [ { "title": "A", "content": "B" }, { "title": "C", "content": "D" } ] }"#,
        Path::new("."),
    )
    .unwrap()
    .with_count(1);
    assert_eq!(m.plan().unwrap().len(), 1);
}
