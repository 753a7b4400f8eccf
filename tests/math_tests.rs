use approx::assert_relative_eq;
use phys_streaming::core::WorldBorder;
use phys_streaming::math::{
    distance_squared_xz, within_distance_xz, Aabb, Matrix3, Matrix4, Orientation, Quaternion,
    Vector3,
};

#[test]
fn test_vector3_operations() {
    let v1 = Vector3::new(1.0, 2.0, 3.0);
    let v2 = Vector3::new(4.0, 5.0, 6.0);

    assert_eq!(v1 + v2, Vector3::new(5.0, 7.0, 9.0));
    assert_eq!(v2 - v1, Vector3::new(3.0, 3.0, 3.0));
    assert_eq!(v1 * 2.0, Vector3::new(2.0, 4.0, 6.0));
    assert_eq!(v1.dot(&v2), 32.0);
    assert_eq!(v1.cross(&v2), Vector3::new(-3.0, 6.0, -3.0));

    assert_relative_eq!(v1.normalize().length(), 1.0);
    assert!(Vector3::ZERO.normalize().is_zero());
}

#[test]
fn test_cross_unit_of_parallel_axes_is_zero() {
    let x = Vector3::unit_x();
    assert!(x.cross_unit(&(x * 3.0)).is_zero());
    assert_relative_eq!(x.cross_unit(&Vector3::unit_y()), Vector3::unit_z());
}

#[test]
fn test_yaw_rotates_x_towards_negative_z() {
    let q = Orientation::new(0.0, 90.0, 0.0).to_quaternion();
    let rotated = q.rotate_vector(Vector3::unit_x());
    assert_relative_eq!(rotated, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
}

#[test]
fn test_orientation_matches_euler_matrix_product() {
    let orientation = Orientation::new(30.0, 45.0, 60.0);
    let from_quat = orientation.to_quaternion().to_rotation_matrix();
    let expected = Matrix3::rotation_x(30f64.to_radians())
        * Matrix3::rotation_y(45f64.to_radians())
        * Matrix3::rotation_z(60f64.to_radians());

    for i in 0..3 {
        assert_relative_eq!(from_quat.column(i), expected.column(i), epsilon = 1e-12);
    }
}

#[test]
fn test_quaternion_nalgebra_round_trip() {
    let q = Orientation::new(10.0, -20.0, 35.0).to_quaternion();
    let back = Quaternion::from_nalgebra(&q.to_nalgebra());
    assert_relative_eq!(back.w, q.w, epsilon = 1e-12);
    assert_relative_eq!(back.x, q.x, epsilon = 1e-12);
    assert_relative_eq!(back.y, q.y, epsilon = 1e-12);
    assert_relative_eq!(back.z, q.z, epsilon = 1e-12);
}

#[test]
fn test_matrix4_agrees_with_nalgebra() {
    let rotation = Orientation::new(15.0, 70.0, -5.0).to_quaternion().to_rotation_matrix();
    let m = Matrix4::from_rotation_translation(rotation, Vector3::new(4.0, -2.0, 9.0));
    let p = Vector3::new(1.5, 2.5, -3.5);

    let ours = m.multiply_point(p);
    let theirs = m.to_nalgebra().transform_point(&nalgebra::Point3::new(p.x, p.y, p.z));
    assert_relative_eq!(ours, Vector3::new(theirs.x, theirs.y, theirs.z), epsilon = 1e-12);
}

#[test]
fn test_matrix4_composition_applies_right_operand_first() {
    let translate = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));
    let rotate = Matrix4::from_rotation_translation(Matrix3::rotation_z(90f64.to_radians()), Vector3::ZERO);
    let p = (translate * rotate).multiply_point(Vector3::unit_x());
    assert_relative_eq!(p, Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
}

#[test]
fn test_aabb_grow_and_edges() {
    let aabb = Aabb::from_points([Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 4.0, 6.0)]).unwrap();
    assert_relative_eq!(aabb.average_edge_length(), 4.0);

    let grown = aabb.grow(3.0);
    assert_eq!(grown.min, Vector3::new(-3.0, -3.0, -3.0));
    assert_eq!(grown.max, Vector3::new(5.0, 7.0, 9.0));
    assert!(grown.contains_point(aabb.center()));
    assert!(grown.intersects(&aabb));

    assert!(Aabb::from_points(std::iter::empty()).is_none());
}

#[test]
fn test_xz_distance_ignores_height_and_is_strict() {
    let a = Vector3::new(0.0, 0.0, 0.0);
    let b = Vector3::new(3.0, 500.0, 4.0);
    assert_eq!(distance_squared_xz(a, b), 25.0);
    assert!(within_distance_xz(a, b, 5.1));
    assert!(!within_distance_xz(a, b, 5.0));
}

#[test]
fn test_world_border_correction() {
    let border = WorldBorder::centered(100.0);

    let inside = Aabb::new(Vector3::new(-10.0, -500.0, -10.0), Vector3::new(10.0, 500.0, 10.0));
    assert!(border.correction_for(&inside).is_zero());

    let past_max_x = Aabb::new(Vector3::new(90.0, 0.0, 0.0), Vector3::new(104.0, 1.0, 1.0));
    assert_eq!(border.correction_for(&past_max_x), Vector3::new(-4.0, 0.0, 0.0));

    let past_min_z = Aabb::new(Vector3::new(0.0, 0.0, -107.0), Vector3::new(1.0, 1.0, -95.0));
    assert_eq!(border.correction_for(&past_min_z), Vector3::new(0.0, 0.0, 7.0));
}
