use crate::geom::coordinate::{Matrix, Point};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    origin: Point,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Maps the origin as a point and the size as a second point, so rotation
    /// and shear reach the size vector as well.
    pub fn transform(&self, matrix: &Matrix) -> Rect {
        let o = self.origin.transform(matrix);
        let s = Point::new(self.width, self.height).transform(matrix);
        Rect::new(o.x, o.y, s.x, s.y)
    }
}
