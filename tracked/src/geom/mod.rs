pub mod coordinate;
pub mod rect;

pub use coordinate::{Matrix, Point};
pub use rect::Rect;
