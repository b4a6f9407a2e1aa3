use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cube_steps::{app, renumber, steps::Step};

#[derive(Parser)]
#[command(name = "cube-steps", about = "Incremental winit + wgpu snapshots")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window and run one snapshot
    Run {
        /// Snapshot number, e.g. 02 or 08
        step: Step,
    },
    /// List the available snapshots
    List,
    /// Rename a duplicated snapshot directory's project files to the number
    /// in the directory's name
    Renumber {
        /// Stem the numbered files share
        #[arg(long, default_value = renumber::DEFAULT_ROOT)]
        root: String,
        /// Snapshot directory to rewrite
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Run { step } => app::run(step),
        Commands::List => {
            for step in Step::ALL {
                println!("{}  {}", step.number(), step.title());
            }
            Ok(())
        }
        Commands::Renumber { root, dir } => {
            let rewritten = renumber::renumber_dir(&dir, &root)?;
            if rewritten.is_empty() {
                println!("nothing to renumber in {}", dir.display());
            }
            for (old, new) in rewritten {
                println!("{} -> {}", old.display(), new.display());
            }
            Ok(())
        }
    }
}
