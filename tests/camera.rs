use fdgraph::camera::framing_distance;
use fdgraph::{compute_framing_position, framing_position_or_default, FramingError, NVec3};

const EPS: f64 = 1e-9;

#[test]
fn camera_on_axis_moves_to_framing_distance() {
    let camera = NVec3::new(0.0, 0.0, 500.0);
    let target = NVec3::zeros();

    // 100 / tan(45 deg) = 100
    let p = compute_framing_position(camera, target, 100.0, 90.0).unwrap();
    assert!((p - NVec3::new(0.0, 0.0, 100.0)).norm() < EPS, "{:?}", p);
}

#[test]
fn distance_follows_radius_over_tan_half_fov() {
    let camera = NVec3::new(-300.0, 220.0, 40.0);
    let target = NVec3::new(12.0, -5.0, 7.5);

    for (radius, fov) in [(100.0, 75.0), (30.0, 40.0), (250.0, 120.0)] {
        let p = compute_framing_position(camera, target, radius, fov).unwrap();
        let expected = radius / (fov / 2.0_f64).to_radians().tan();
        assert!(((p - target).norm() - expected).abs() < 1e-6);
    }
}

#[test]
fn viewing_direction_is_preserved() {
    let camera = NVec3::new(80.0, -60.0, 150.0);
    let target = NVec3::new(10.0, 10.0, 10.0);

    let p = compute_framing_position(camera, target, 100.0, 75.0).unwrap();
    let before = (camera - target).normalize();
    let after = (p - target).normalize();
    assert!((before - after).norm() < 1e-9);
}

#[test]
fn camera_below_target_stays_below() {
    let target = NVec3::new(5.0, 5.0, 5.0);
    let camera = NVec3::new(5.0, 5.0, -300.0);

    let p = compute_framing_position(camera, target, 100.0, 90.0).unwrap();
    assert!(p.iter().all(|c| c.is_finite()));
    assert!((p - NVec3::new(5.0, 5.0, -95.0)).norm() < 1e-6, "{:?}", p);
}

#[test]
fn zero_radius_lands_on_target() {
    let target = NVec3::new(1.0, 2.0, 3.0);
    let p = compute_framing_position(NVec3::new(9.0, 9.0, 9.0), target, 0.0, 75.0).unwrap();
    assert!((p - target).norm() < EPS);
}

#[test]
fn coincident_camera_and_target_is_an_error() {
    let target = NVec3::new(3.0, 4.0, 5.0);
    assert_eq!(
        compute_framing_position(target, target, 100.0, 75.0),
        Err(FramingError::DegenerateDirection)
    );
}

#[test]
fn coincident_camera_falls_back_to_z_axis() {
    let target = NVec3::new(3.0, 4.0, 5.0);
    let p = framing_position_or_default(target, target, 100.0, 90.0).unwrap();
    assert!((p - NVec3::new(3.0, 4.0, 105.0)).norm() < 1e-9);
}

#[test]
fn bad_field_of_view_or_radius_is_rejected() {
    let camera = NVec3::new(0.0, 0.0, 10.0);
    let target = NVec3::zeros();

    for fov in [0.0, 180.0, -10.0, f64::NAN] {
        assert!(matches!(
            compute_framing_position(camera, target, 100.0, fov),
            Err(FramingError::InvalidParameter(_))
        ));
    }
    assert!(matches!(
        compute_framing_position(camera, target, -1.0, 75.0),
        Err(FramingError::InvalidParameter(_))
    ));
    assert!(framing_distance(f64::INFINITY, 75.0).is_err());
}
