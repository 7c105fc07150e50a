use super::*;
use crate::render::surface::RecordingSurface;

#[test]
fn one_program_per_kind() {
    let mut surface = RecordingSurface::new(4.0, 4.0);
    let mut cache = ProgramCache::new();
    assert!(cache.is_empty());

    let a = cache.get_or_create("drawquad", &mut surface);
    let b = cache.get_or_create("drawquad", &mut surface);
    let c = cache.get_or_create("rect", &mut surface);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(cache.len(), 2);
    assert_eq!(surface.programs_created(), 2);
    assert_eq!(cache.get("drawquad"), Some(a));
    assert_eq!(cache.get("image"), None);
}

#[test]
fn clear_forces_recreation() {
    let mut surface = RecordingSurface::new(4.0, 4.0);
    let mut cache = ProgramCache::new();
    let first = cache.get_or_create("drawquad", &mut surface);
    cache.clear();
    let second = cache.get_or_create("drawquad", &mut surface);
    assert_ne!(first, second);
    assert_eq!(surface.programs_created(), 2);
}
