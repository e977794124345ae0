use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use tracked::device::trace::TraceDevice;
use tracked::script::{run, Operation};
use tracked::{TrackError, TrackedSurface, TrackerConfig, UnderflowPolicy};

/// Runs a script against a recording device and writes the surface calls as XML.
#[derive(Debug, Parser)]
pub struct Config {
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Draw control points and lines for every curve.
    #[arg(long)]
    pub(crate) show_controls: bool,

    /// Ignore a `restore` without a matching `save`.
    #[arg(long)]
    pub(crate) lenient: bool,
}

impl Config {
    fn tracker_config(&self) -> TrackerConfig {
        let underflow = if self.lenient {
            UnderflowPolicy::Lenient
        } else {
            UnderflowPolicy::Strict
        };
        TrackerConfig::default()
            .show_controls(self.show_controls)
            .underflow(underflow)
    }
}

pub fn command(ops: &[Operation], cfg: Config) -> tracked::Result<()> {
    let mut device = TraceDevice::new();
    {
        let mut surface = TrackedSurface::with_config(&mut device, cfg.tracker_config());
        run(ops, &mut surface)?;
    }
    let outname = cfg.output.unwrap_or(PathBuf::from("trace.xml"));
    info!("write {} calls to {}", device.calls().len(), outname.display());
    let file_error = |e: std::io::Error| TrackError::File(format!("{}: {}", outname.display(), e));
    let mut file = File::create(&outname).map_err(file_error)?;
    file.write_all(device.xml().as_bytes()).map_err(file_error)?;
    Ok(())
}
