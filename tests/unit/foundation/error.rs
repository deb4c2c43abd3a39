use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MotionError::invalid_range("x")
            .to_string()
            .contains("invalid range:")
    );
    assert!(
        MotionError::invalid_spring("x")
            .to_string()
            .contains("invalid spring config:")
    );
    assert!(
        MotionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MotionError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        MotionError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MotionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn context_keeps_variant() {
    let err = MotionError::invalid_range("not increasing").with_context("sequence 'cta'");
    assert!(matches!(err, MotionError::InvalidRange(_)));
    assert_eq!(
        err.to_string(),
        "invalid range: sequence 'cta': not increasing"
    );

    let other = MotionError::Other(anyhow::anyhow!("disk")).with_context("load");
    assert!(format!("{other:#}").contains("disk"));
}
