use super::*;

const EPS: f64 = 1e-12;

#[test]
fn translate_moves_points() {
    let m = Mat4::translate(1.0, 2.0, 3.0);
    assert_eq!(m.mul_vec4([1.0, 1.0, 1.0, 1.0]), [2.0, 3.0, 4.0, 1.0]);
    assert_eq!(m.at(0, 3), 1.0);
    assert_eq!(m.at(2, 3), 3.0);
}

#[test]
fn product_applies_right_operand_first() {
    let t = Mat4::translate(10.0, 0.0, 0.0);
    let s = Mat4::scale(2.0, 2.0, 1.0);
    let p = [1.0, 1.0, 0.0, 1.0];
    // s * t: translate, then scale.
    assert_eq!((s * t).mul_vec4(p), [22.0, 2.0, 0.0, 1.0]);
    assert_eq!((t * s).mul_vec4(p), [12.0, 2.0, 0.0, 1.0]);
}

#[test]
fn identity_is_neutral() {
    let m = Mat4::rotate_xyz(0.3, -0.2, 1.1) * Mat4::translate(4.0, 5.0, 6.0);
    assert!((m * Mat4::IDENTITY).approx_eq(&m, EPS));
    assert!((Mat4::IDENTITY * m).approx_eq(&m, EPS));
    assert_eq!(Mat4::default(), Mat4::IDENTITY);
}

#[test]
fn rotate_xyz_matches_axis_product() {
    let (x, y, z) = (0.4, -1.2, 2.0);
    let expected = Mat4::rotate_z(z) * Mat4::rotate_y(y) * Mat4::rotate_x(x);
    assert!(Mat4::rotate_xyz(x, y, z).approx_eq(&expected, 1e-12));
}

#[test]
fn pixel_ortho_maps_surface_corners() {
    let m = Mat4::pixel_ortho(200.0, 100.0, 5000.0);
    let close = |a: [f64; 4], b: [f64; 4]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12);
    assert!(close(m.mul_vec4([0.0, 0.0, 0.0, 1.0]), [-1.0, 1.0, -1.0, 1.0]));
    assert!(close(m.mul_vec4([200.0, 100.0, 0.0, 1.0]), [1.0, -1.0, -1.0, 1.0]));
    assert!(close(m.mul_vec4([100.0, 50.0, 5000.0, 1.0]), [0.0, 0.0, 1.0, 1.0]));
}

#[test]
fn transpose_round_trips() {
    let m = Mat4::translate(1.0, 2.0, 3.0);
    assert_eq!(m.transpose().at(3, 0), 1.0);
    assert_eq!(m.transpose().transpose(), m);
}

#[test]
fn vec3_ops() {
    let a = Vec3::new(1.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(a.cross(b), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(a.dot(b), 0.0);
    assert_eq!((a + b - a), b);
    assert_eq!(-a, Vec3::new(-1.0, 0.0, 0.0));
    assert!((Vec3::new(3.0, 4.0, 0.0).normalize().length() - 1.0).abs() < EPS);
    assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
}
