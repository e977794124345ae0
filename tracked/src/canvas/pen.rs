use crate::geom::Point;

/// Tracked drawing position, in surface space.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PenState {
    pub x: f64,
    pub y: f64,
    /// Begin-point of the current path, the implicit close target of fill/clip.
    pub bx: f64,
    pub by: f64,
    pub just_begun: bool,
}

impl PenState {
    pub fn begin(&mut self) {
        self.just_begun = true;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.just_begun {
            self.just_begun = false;
            self.bx = x;
            self.by = y;
        }
        self.x = x;
        self.y = y;
    }

    pub fn set_begin(&mut self, x: f64, y: f64) {
        self.bx = x;
        self.by = y;
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn begin_point(&self) -> Point {
        Point::new(self.bx, self.by)
    }
}
