use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PageError::cycle("x").to_string().contains("graph cycle:"));
    assert!(
        PageError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PageError::resource("x").to_string().contains("resource error:"));
    assert!(
        PageError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_cycle());
}

#[test]
fn is_cycle_only_for_cycles() {
    assert!(PageError::cycle("a -> b -> a").is_cycle());
    assert!(!PageError::validation("x").is_cycle());
}
