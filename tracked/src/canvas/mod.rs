mod config;
pub mod debug;
pub mod font;
mod pen;
mod scoped;
mod tracked;
mod transform_stack;

pub use config::{TrackerConfig, UnderflowPolicy};
pub use debug::{DebugSegment, DebugStyle, LineStyle, PointStyle};
pub use pen::PenState;
pub use tracked::TrackedSurface;
pub use transform_stack::TransformStack;
