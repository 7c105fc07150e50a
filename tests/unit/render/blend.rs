use super::*;

#[test]
fn defaults_are_straight_alpha_over() {
    assert_eq!(BlendParams::default().resolve(), BlendState::default());
}

#[test]
fn names_parse_case_insensitively() {
    assert_eq!(BlendEquation::parse("ReverseSubtract"), BlendEquation::ReverseSubtract);
    assert_eq!(BlendEquation::parse("subtract"), BlendEquation::Subtract);
    assert_eq!(BlendFactor::parse("ONE"), Some(BlendFactor::One));
    assert_eq!(
        BlendFactor::parse("oneMinusConstantAlpha"),
        Some(BlendFactor::OneMinusConstantAlpha)
    );
    assert_eq!(BlendFactor::parse("half"), None);
}

#[test]
fn unknown_names_fall_back_per_slot() {
    let params = BlendParams {
        equation_rgb: "max".into(),
        src_rgb: "bogus".into(),
        dst_alpha: "bogus".into(),
        src_alpha: "one".into(),
        color: Rgba::WHITE.into(),
        ..BlendParams::default()
    };
    let state = params.resolve();
    assert_eq!(state.equation_rgb, BlendEquation::FuncAdd);
    assert_eq!(state.src_rgb, BlendFactor::SrcAlpha);
    assert_eq!(state.src_alpha, BlendFactor::One);
    assert_eq!(state.dst_alpha, BlendFactor::OneMinusSrcAlpha);
    assert_eq!(state.color, Rgba::WHITE);
}

#[test]
fn computed_names_are_read_at_resolve_time() {
    let flip = std::rc::Rc::new(std::cell::Cell::new(false));
    let f = std::rc::Rc::clone(&flip);
    let params = BlendParams {
        dst_rgb: Value::computed(move || if f.get() { "zero" } else { "one" }.to_owned()),
        ..BlendParams::default()
    };
    assert_eq!(params.resolve().dst_rgb, BlendFactor::One);
    flip.set(true);
    assert_eq!(params.resolve().dst_rgb, BlendFactor::Zero);
}
