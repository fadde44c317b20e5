use nalgebra::{Rotation3, Vector3};

/// The images of the perifocal x and y axes in scene space.
///
/// A point `(x, y)` in the orbital plane (x towards periapsis) lands at
/// `x * p + y * q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerifocalBasis {
    pub p: Vector3<f64>,
    pub q: Vector3<f64>,
}

impl PerifocalBasis {
    pub fn from_angles(incl: f64, lan: f64, argp: f64) -> Self {
        let (sin_i, cos_i) = incl.sin_cos();
        let (sin_o, cos_o) = lan.sin_cos();
        let (sin_w, cos_w) = argp.sin_cos();

        // First two columns of Rz(lan) * Rx(incl) * Rz(argp), written out.
        let p = Vector3::new(
            cos_o * cos_w - sin_o * sin_w * cos_i,
            sin_o * cos_w + cos_o * sin_w * cos_i,
            sin_i * sin_w,
        );
        let q = Vector3::new(
            -(cos_o * sin_w + sin_o * cos_w * cos_i),
            -(sin_o * sin_w - cos_o * cos_w * cos_i),
            sin_i * cos_w,
        );

        Self { p, q }
    }

    pub fn to_scene(&self, x: f64, y: f64) -> Vector3<f64> {
        x * self.p + y * self.q
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.p.cross(&self.q)
    }
}

pub fn rotation_from_angles(incl: f64, lan: f64, argp: f64) -> Rotation3<f64> {
    // We have an orbit in the xy plane where the periapsis is pointed along the
    // x-axis. So first, we rotate it around z until the periapsis is at argp
    // away from the x-axis (which will now be the ascending node). We then
    // rotate around x to get the inclination, and then one final turn around z
    // to get the correct longitude of the AN.
    Rotation3::from_axis_angle(&Vector3::z_axis(), lan)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), incl)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), argp)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_identity_orientation() {
        let basis = PerifocalBasis::from_angles(0.0, 0.0, 0.0);
        assert_relative_eq!(basis.p, Vector3::x());
        assert_relative_eq!(basis.q, Vector3::y());
        assert_relative_eq!(basis.to_scene(2.0, -3.0), Vector3::new(2.0, -3.0, 0.0));
    }

    #[test]
    fn test_matches_rotation_composition() {
        let angles = [
            (30.0_f64, 60.0_f64, 45.0_f64),
            (7.155, 23.439281, -11.26064),
            (90.0, 0.0, 0.0),
            (120.0, 300.0, 200.0),
            (0.0, 45.0, 45.0),
        ];

        for (incl, lan, argp) in angles {
            let (incl, lan, argp) = (incl.to_radians(), lan.to_radians(), argp.to_radians());
            let basis = PerifocalBasis::from_angles(incl, lan, argp);
            let rotation = rotation_from_angles(incl, lan, argp);

            assert_relative_eq!(basis.p, rotation * Vector3::x(), epsilon = 1e-14);
            assert_relative_eq!(basis.q, rotation * Vector3::y(), epsilon = 1e-14);
            assert_relative_eq!(basis.normal(), rotation * Vector3::z(), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let basis = PerifocalBasis::from_angles(0.4, 2.0, -1.3);
        assert_relative_eq!(basis.p.norm(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(basis.q.norm(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(basis.p.dot(&basis.q), 0.0, epsilon = 1e-14);
    }
}
