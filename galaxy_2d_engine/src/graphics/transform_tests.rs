use super::*;

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-4
}

#[test]
fn test_from_3x3_row_major() {
    let t = Transform::from_3x3(2.0, 0.0, 10.0, 0.0, 3.0, 20.0, 0.0, 0.0, 1.0);
    assert!(approx(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 23.0)));
}

#[test]
fn test_translate_then_scale_order() {
    // scale is applied first, then translation
    let t = Transform::IDENTITY.translate(Vec2::new(5.0, 0.0)).scale(Vec2::new(2.0, 2.0));
    assert!(approx(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(7.0, 2.0)));
}

#[test]
fn test_rotate_around_center() {
    let t = Transform::IDENTITY.rotate(90.0, Vec2::new(1.0, 1.0));
    assert!(approx(t.transform_point(Vec2::new(2.0, 1.0)), Vec2::new(1.0, 2.0)));
}

#[test]
fn test_inverse_round_trip() {
    let t = Transform::IDENTITY
        .translate(Vec2::new(3.0, -4.0))
        .rotate(30.0, Vec2::ZERO)
        .scale(Vec2::new(2.0, 0.5));
    let p = Vec2::new(7.0, 11.0);
    assert!(approx(t.inverse().transform_point(t.transform_point(p)), p));
}

#[test]
fn test_inverse_of_small_scale() {
    // Projection of an 8000x6000 world, determinant below f32::EPSILON
    let t = Transform::IDENTITY.scale(Vec2::new(2.0 / 8000.0, -2.0 / 6000.0));
    assert!(t.matrix().determinant().abs() < f32::EPSILON);

    let inverse = t.inverse();
    assert_ne!(inverse, Transform::IDENTITY);
    assert!((inverse.transform_point(Vec2::new(0.5, -0.5)) - Vec2::new(2000.0, 1500.0)).length() < 1e-2);
}

#[test]
fn test_singular_inverse_is_identity() {
    let t = Transform::IDENTITY.scale(Vec2::new(0.0, 1.0));
    assert_eq!(t.inverse(), Transform::IDENTITY);
}

#[test]
fn test_mat3_extraction() {
    let t = Transform::from_3x3(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0, 1.0);
    assert_eq!(t.to_mat3_cols_array(), [1.0, 4.0, 0.0, 2.0, 5.0, 0.0, 3.0, 6.0, 1.0]);
}
