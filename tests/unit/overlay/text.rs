use super::*;

#[test]
fn fallback_metrics_scale_with_text_length() {
    let mut engine = TextEngine::without_font();
    assert!(!engine.has_font());

    let short = engine.layout("5 s");
    let long = engine.layout("500 s");
    assert!(short.shaped.is_none());
    assert!((short.width - 3.0 * 14.0 * 0.6).abs() < 1e-3);
    assert!(long.width > short.width);
    assert_eq!(short.height, 14.0);
    assert!((short.baseline - 14.0 * 0.8).abs() < 1e-3);
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let err = TextEngine::from_font_bytes(b"not a font".to_vec()).unwrap_err();
    assert!(matches!(err, VizError::Config(_)));
}

#[test]
fn missing_configured_font_is_an_error() {
    let err = TextEngine::discover(Some(Path::new("/definitely/not/here.ttf"))).unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn discovered_font_shapes_non_empty_text() {
    let mut engine = TextEngine::discover(None).unwrap();
    let block = engine.layout("12 s");
    if engine.has_font() {
        assert!(block.shaped.is_some());
        assert!(block.width > 0.0);
        assert!(block.height > 0.0);
        assert!(block.baseline > block.height / 2.0 && block.baseline < block.height);
    } else {
        assert!(block.shaped.is_none());
    }
}
