//! Scoring CLI
//!
//! Replays match command logs through the scoring engine and prints
//! scorecards; also inspects persisted checkpoints and scorecards.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use ls_core::SaveManager;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ls_cli")]
#[command(about = "Replay and inspect live-scoring matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Replay a match file (teams + command log) and print the scorecard
    Replay {
        /// Input match file path
        #[arg(long)]
        r#in: PathBuf,

        /// Checkpoint directory; when set, the replayed session is
        /// checkpointed there and a completed match gets its scorecard
        /// written
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Treat any rejected command as a hard failure
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Recover a checkpointed session and print its scorecard
    Show {
        /// Checkpoint directory
        #[arg(long)]
        save_dir: PathBuf,

        /// Match id of the checkpoint to load
        #[arg(long)]
        match_id: String,
    },

    /// Score a canned two-over demo match and print the scorecard
    Demo,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { r#in, save_dir, strict } => {
            println!("Replaying {}", r#in.display());
            let file = ls_cli::load_match_file(&r#in)?;
            let (session, report) = ls_cli::run_replay(&file)?;

            println!("Applied {} commands", report.applied);
            for (index, err) in &report.rejected {
                eprintln!("  command {} rejected: {}", index, err);
            }
            if strict && !report.rejected.is_empty() {
                anyhow::bail!("{} commands rejected", report.rejected.len());
            }

            print!("\n{}", ls_cli::render_scorecard(&session));

            if let Some(dir) = save_dir {
                let manager = SaveManager::new(&dir);
                let path = manager.checkpoint(&session)?;
                println!("Checkpoint written to {}", path.display());
                if let Some(completion) = session.completion() {
                    manager.record_completion(completion)?;
                    println!("Scorecard recorded for match {}", session.match_id());
                }
            }
        }

        Commands::Show { save_dir, match_id } => {
            let manager = SaveManager::new(&save_dir);
            let session = manager.recover(&match_id)?;
            print!("{}", ls_cli::render_scorecard(&session));
        }

        Commands::Demo => {
            let file = ls_cli::demo_match_file();
            let (session, report) = ls_cli::run_replay(&file)?;
            println!("Applied {} commands\n", report.applied);
            print!("{}", ls_cli::render_scorecard(&session));
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ls_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
