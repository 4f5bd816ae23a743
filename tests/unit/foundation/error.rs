use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VizError::config("x")
            .to_string()
            .starts_with("configuration error:")
    );
    assert!(VizError::shape("x").to_string().starts_with("shape mismatch:"));
    assert!(
        VizError::data("x")
            .to_string()
            .starts_with("tabular data error:")
    );
    assert!(VizError::source("x").to_string().starts_with("source error:"));
    assert!(VizError::encode("x").to_string().starts_with("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk full");
    let err = VizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk full"));
}
