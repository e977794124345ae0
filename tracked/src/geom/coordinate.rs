use std::fmt;

use crate::error::{Result, TrackError};

/// Tolerance used for invertibility checks.
pub const EPSILON: f64 = 1e-14;

/// Affine matrix in canvas column order:
///
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
///
/// Composition methods multiply on the right (`self = self * T`), so the
/// newest operation applies first in local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Matrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn new_translation_matrix(e: f64, f: f64) -> Matrix {
        Matrix::new(1.0, 0.0, 0.0, 1.0, e, f)
    }

    pub fn reset(&mut self) -> &mut Self {
        *self = Matrix::identity();
        self
    }

    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        *self = Matrix::new(a, b, c, d, e, f);
        self
    }

    /// Right-multiplies `self` by the given matrix.
    pub fn transform(&mut self, a2: f64, b2: f64, c2: f64, d2: f64, e2: f64, f2: f64) -> &mut Self {
        let Matrix { a, b, c, d, e, f } = *self;
        self.a = a * a2 + c * b2;
        self.b = b * a2 + d * b2;
        self.c = a * c2 + c * d2;
        self.d = b * c2 + d * d2;
        self.e = a * e2 + c * f2 + e;
        self.f = b * e2 + d * f2 + f;
        self
    }

    pub fn multiply(&mut self, by: &Matrix) -> &mut Self {
        self.transform(by.a, by.b, by.c, by.d, by.e, by.f)
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.transform(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.transform(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        self.transform(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn rotate_deg(&mut self, angle: f64) -> &mut Self {
        self.rotate(angle.to_radians())
    }

    pub fn shear(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.transform(1.0, sy, sx, 1.0, 0.0, 0.0)
    }

    /// Skew by angles in radians.
    pub fn skew(&mut self, ax: f64, ay: f64) -> &mut Self {
        self.shear(ax.tan(), ay.tan())
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= EPSILON
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Matrix::identity(), EPSILON)
    }

    pub fn inverse(&self) -> Result<Matrix> {
        let dt = self.determinant();
        if dt.abs() < EPSILON {
            return Err(TrackError::NotInvertible);
        }
        Ok(Matrix {
            a: self.d / dt,
            b: -self.b / dt,
            c: -self.c / dt,
            d: self.a / dt,
            e: (self.c * self.f - self.d * self.e) / dt,
            f: -(self.a * self.f - self.b * self.e) / dt,
        })
    }

    pub fn apply_to_point(&self, x: f64, y: f64) -> Point {
        Point::new(
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(l, r)| (l - r).abs() < eps)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn transform(&self, matrix: &Matrix) -> Point {
        matrix.apply_to_point(self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // one decimal, the way the overlay and trace report points
        write!(
            f,
            "({}, {})",
            round_tenth(self.x),
            round_tenth(self.y)
        )
    }
}

/// Rounds to one decimal with halves going up, so `-2.25` gives `-2.2`.
pub(crate) fn round_tenth(v: f64) -> f64 {
    (v * 10.0 + 0.5).floor() / 10.0
}
