//! 2D affine transforms backing the raster surface's coordinate stack.

/// Row-major 2×3 affine matrix mapping local coordinates to device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    m: [[f64; 3]; 2],
}

impl Affine {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Map a local point into device space.
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.m[0][2],
            self.m[1][0] * x + self.m[1][1] * y + self.m[1][2],
        )
    }

    /// Compose with a translation applied in local space.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        self.compose(Self {
            m: [[1.0, 0.0, dx], [0.0, 1.0, dy]],
        })
    }

    /// Compose with a rotation (radians) applied in local space.
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        self.compose(Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0]],
        })
    }

    /// Compose with a non-uniform scale applied in local space.
    #[must_use]
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        self.compose(Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0]],
        })
    }

    // self ∘ other: `other` maps local space into self's local space first.
    fn compose(self, other: Self) -> Self {
        let a = self.m;
        let b = other.m;
        Self {
            m: [
                [
                    a[0][0] * b[0][0] + a[0][1] * b[1][0],
                    a[0][0] * b[0][1] + a[0][1] * b[1][1],
                    a[0][0] * b[0][2] + a[0][1] * b[1][2] + a[0][2],
                ],
                [
                    a[1][0] * b[0][0] + a[1][1] * b[1][0],
                    a[1][0] * b[0][1] + a[1][1] * b[1][1],
                    a[1][0] * b[0][2] + a[1][1] * b[1][2] + a[1][2],
                ],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() <= 1e-9 && (a.1 - b.1).abs() <= 1e-9
    }

    #[test]
    fn identity_maps_points_unchanged() {
        assert_eq!(Affine::IDENTITY.apply(3.5, -2.0), (3.5, -2.0));
    }

    #[test]
    fn translation_offsets_device_points() {
        let t = Affine::IDENTITY.translated(10.0, 20.0);
        assert!(approx(t.apply(1.0, 2.0), (11.0, 22.0)));
    }

    #[test]
    fn rotation_is_applied_in_local_space() {
        // Translate then rotate: the rotation spins around the translated
        // origin, not the device origin.
        let t = Affine::IDENTITY.translated(100.0, 0.0).rotated(FRAC_PI_2);
        assert!(approx(t.apply(5.0, 0.0), (100.0, 5.0)));
    }

    #[test]
    fn scale_composes_with_translation() {
        let t = Affine::IDENTITY.translated(10.0, 10.0).scaled(2.0, 3.0);
        assert!(approx(t.apply(1.0, 1.0), (12.0, 13.0)));
    }
}
