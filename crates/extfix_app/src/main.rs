//! extfix - signature-based file extension repair.
//!
//! Walks a directory tree, sniffs the magic bytes of every file and renames
//! files whose extension does not match their actual content. Useful for
//! recovered or exported data where filenames were lost or mangled.

mod engine;
mod renamer;
mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "extfix")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to scan. Defaults to the current working directory.
    root: Option<PathBuf>,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = engine::DEFAULT_WORKERS)]
    workers: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let root = match args.root {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve current working directory")?,
    };
    anyhow::ensure!(
        root.is_dir(),
        "scan root is not a directory: {}",
        root.display()
    );

    engine::run(&root, args.workers.max(1), running)?;

    Ok(())
}
