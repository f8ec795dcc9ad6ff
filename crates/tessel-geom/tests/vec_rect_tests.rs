use tessel_geom::{Rect, Transform, Vec2, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec2_add_sub() {
    let a = Vec2::new(1.0, 2.0);
    let b = Vec2::new(-4.0, 5.0);
    assert_eq!(a + b, Vec2::new(-3.0, 7.0));
    assert_eq!((a + b) - a, b);
}

#[test]
fn vec3_add_assign_sub_assign() {
    let mut v = Vec3::new(1.0, 1.0, 1.0);
    v += Vec3::new(2.0, 3.0, 4.0);
    assert!(vec3_approx_eq(v, Vec3::new(3.0, 4.0, 5.0), 1e-6));

    v -= Vec3::new(1.0, 2.0, 3.0);
    assert!(vec3_approx_eq(v, Vec3::new(2.0, 2.0, 2.0), 1e-6));
}

#[test]
fn rect_from_corners_orders_bounds() {
    let r = Rect::from_corners(Vec2::new(4.0, -1.0), Vec2::new(-2.0, 3.0));
    assert_eq!(r.min, Vec2::new(-2.0, -1.0));
    assert_eq!(r.max, Vec2::new(4.0, 3.0));
    assert_eq!(r.width(), 6.0);
    assert_eq!(r.height(), 4.0);
    assert_eq!(r.center(), Vec2::new(1.0, 1.0));
    assert!(r.contains(Vec2::new(0.0, 0.0)));
    assert!(!r.contains(Vec2::new(5.0, 0.0)));
}

#[test]
fn transform_carries_translation() {
    let t = Transform::from_translation(Vec3::new(10.0, 0.0, 1.0));
    assert!(vec3_approx_eq(t.translation, Vec3::new(10.0, 0.0, 1.0), 1e-6));
    assert_ne!(t, Transform::IDENTITY);
}
