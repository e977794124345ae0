pub mod canvas;
pub mod device;
pub mod error;
pub mod geom;
pub mod script;

pub use canvas::{TrackedSurface, TrackerConfig, UnderflowPolicy};
pub use device::Device;
pub use error::{Result, TrackError};
pub use geom::{Matrix, Point, Rect};
