pub mod cairo_device;

pub use cairo_device::CairoDevice;
