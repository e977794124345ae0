pub mod trace;
pub mod transform;
