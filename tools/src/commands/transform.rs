use clap::Parser;

use tracked::device::trace::TraceDevice;
use tracked::script::{is_transform, run, Operation};
use tracked::{Point, TrackedSurface};

/// Applies the transform operations of a script and maps a user-space point
/// to surface space and back.
#[derive(Debug, Parser)]
pub struct Config {
    #[arg(allow_negative_numbers = true)]
    pub(crate) x: f64,
    #[arg(allow_negative_numbers = true)]
    pub(crate) y: f64,
}

pub fn command(ops: &[Operation], cfg: Config) -> tracked::Result<()> {
    let transforms: Vec<Operation> = ops
        .iter()
        .filter(|op| is_transform(op.name()))
        .cloned()
        .collect();
    let mut device = TraceDevice::new();
    let mut surface = TrackedSurface::new(&mut device);
    run(&transforms, &mut surface)?;

    let matrix = *surface.current_transform();
    let mapped = surface.transform_coordinate(cfg.x, cfg.y);
    println!("{}", matrix);
    println!("user {} -> surface {}", Point::new(cfg.x, cfg.y), mapped);
    match surface.transform_point(mapped.x, mapped.y) {
        Ok(back) => println!("surface {} -> user {}", mapped, back),
        Err(e) => println!("surface {} -> user: {}", mapped, e),
    }
    Ok(())
}
