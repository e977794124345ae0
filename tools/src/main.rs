use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use tracked::script::parse_script;
mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "FILE")]
    script: PathBuf,
}

#[derive(Parser, Debug)]
enum Commands {
    Trace(commands::trace::Config),
    Transform(commands::transform::Config),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let source = match std::fs::read_to_string(cli.script.as_path()) {
        Ok(source) => source,
        Err(e) => {
            error!("can't read {}: {}", cli.script.display(), e);
            std::process::exit(1);
        }
    };
    let ops = match parse_script(&source) {
        Ok(ops) => ops,
        Err(e) => {
            error!("{}: {}", cli.script.display(), e);
            std::process::exit(1);
        }
    };
    info!("Process {:?} with {} operations", cli.script.display(), ops.len());

    let result = match cli.command {
        Commands::Trace(cfg) => commands::trace::command(&ops, cfg),
        Commands::Transform(cfg) => commands::transform::command(&ops, cfg),
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
