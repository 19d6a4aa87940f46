use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PostproError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PostproError::expression("x")
            .to_string()
            .contains("expression error:")
    );
    assert!(
        PostproError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(PostproError::io("x").to_string().contains("io error:"));
    assert!(
        PostproError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PostproError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
