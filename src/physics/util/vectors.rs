use bevy::math::{DQuat, DVec3};

/// Spin axis of a body whose pole leans `tilt` radians away from +Y, toward +X
pub fn rotation_axis(tilt: f64) -> DVec3 {
    DVec3::new(tilt.sin(), tilt.cos(), 0.0).normalize()
}

/// A point on a sphere of `radius` from geographic coordinates in degrees.
///
/// Latitude and longitude zero face +X, longitude 90 faces -Z. The sphere is then
/// rotated by `surface_rotation` radians about Z, which is how a tilted body's
/// surface is laid out.
pub fn lat_long_to_vector3(
    latitude: f64,
    longitude: f64,
    radius: f64,
    surface_rotation: f64,
) -> DVec3 {
    let phi = latitude.to_radians();
    let theta = (longitude - 180.0).to_radians();
    let point = DVec3::new(
        -(radius * phi.cos() * theta.cos()),
        radius * phi.sin(),
        radius * phi.cos() * theta.sin(),
    );
    DQuat::from_rotation_z(surface_rotation) * point
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_axis() {
        let axis = rotation_axis(0.0);
        assert_relative_eq!(axis.y, 1.0);
        let axis = rotation_axis(-23.5_f64.to_radians());
        assert_relative_eq!(axis.length(), 1.0, epsilon = 1e-12);
        assert!(axis.x < 0.0);
    }

    #[test]
    fn test_lat_long_untilted() {
        let point = lat_long_to_vector3(0.0, 0.0, 10.0, 0.0);
        assert_relative_eq!(point.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(point.z, 0.0, epsilon = 1e-9);

        let east = lat_long_to_vector3(0.0, 90.0, 10.0, 0.0);
        assert_relative_eq!(east.z, -10.0, epsilon = 1e-9);

        let pole = lat_long_to_vector3(90.0, 45.0, 10.0, 0.0);
        assert_relative_eq!(pole.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lat_long_keeps_radius() {
        for (lat, lon) in [(28.5, -80.6), (45.9, 63.3), (-5.2, -52.7)] {
            let point = lat_long_to_vector3(lat, lon, 10.0, 23.5_f64.to_radians());
            assert_relative_eq!(point.length(), 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lat_long_tilts_pole() {
        let tilt = 23.5_f64.to_radians();
        let pole = lat_long_to_vector3(90.0, 0.0, 1.0, tilt);
        assert_relative_eq!(pole.x, -tilt.sin(), epsilon = 1e-9);
        assert_relative_eq!(pole.y, tilt.cos(), epsilon = 1e-9);
    }
}
