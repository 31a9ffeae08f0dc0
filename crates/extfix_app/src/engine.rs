//! Scan-and-rename pipeline: bounded worker pool, aggregation, logging.
//!
//! A feeder thread pushes file paths into a bounded task channel; a fixed
//! pool of workers reads a 64-byte header window, runs detection and the
//! rename per file, and reports one outcome event each. The main thread is
//! the single aggregator: it drives the progress bar, keeps the counters
//! and appends to the rename log, so log lines never interleave.

use crate::renamer::{self, RenameOutcome};
use crate::scanner;
use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use extfix_core::{Detector, HeaderWindow};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub const DEFAULT_WORKERS: usize = 8;

/// Append-only log kept at the scan root, one line per successful rename.
pub const LOG_FILE_NAME: &str = "File Rename Log.txt";

const TASK_CHANNEL_CAPACITY: usize = 256;
const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug)]
enum WorkerEvent {
    /// One outcome per dispatched file. `None` means the file was
    /// unreadable or matched no known signature.
    FileDone(Option<RenameOutcome>),
    WorkerDone,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub total: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub unknown: usize,
    pub failed: usize,
}

pub fn run(root: &Path, workers: usize, running: Arc<AtomicBool>) -> Result<RunSummary> {
    let start_time = Instant::now();

    let files = scanner::collect_files(root);
    let total = files.len();
    println!("Total files: {}", total);

    let log_path = root.join(LOG_FILE_NAME);
    let mut log: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open rename log: {}", log_path.display()))?;

    let detector = Arc::new(Detector::with_builtin());

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (Remaining: {msg})")
            .expect("invalid progress bar template - this is a bug")
            .progress_chars("##-"),
    );
    pb.set_message(total.to_string());

    let (task_tx, task_rx): (Sender<PathBuf>, Receiver<PathBuf>) =
        bounded(TASK_CHANNEL_CAPACITY);
    let (event_tx, event_rx): (Sender<WorkerEvent>, Receiver<WorkerEvent>) =
        bounded(EVENT_CHANNEL_CAPACITY);

    let mut worker_handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let rx = task_rx.clone();
        let tx = event_tx.clone();
        let detector = Arc::clone(&detector);
        let running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(format!("extfix-worker-{}", worker_id))
            .spawn(move || worker_loop(rx, tx, &detector, &running))
            .context("Failed to spawn worker thread")?;

        worker_handles.push(handle);
    }

    drop(task_rx);
    drop(event_tx);

    // Submission happens off the aggregation thread so a full task channel
    // can never deadlock against a full event channel.
    let feeder_running = Arc::clone(&running);
    let feeder_handle = thread::spawn(move || {
        for path in files {
            if !feeder_running.load(Ordering::SeqCst) {
                break;
            }
            if task_tx.send(path).is_err() {
                break;
            }
        }
    });

    let mut summary = RunSummary {
        total,
        ..Default::default()
    };
    let mut remaining = total;
    let mut workers_done = 0usize;

    while workers_done < workers {
        match event_rx.recv() {
            Ok(WorkerEvent::FileDone(outcome)) => {
                remaining -= 1;
                match outcome {
                    Some(RenameOutcome::Renamed { from, to }) => {
                        summary.renamed += 1;
                        writeln!(log, "RENAMED: {} -> {}", from.display(), to.display())
                            .context("Failed to append to rename log")?;
                    }
                    Some(RenameOutcome::Skipped) => summary.skipped += 1,
                    Some(RenameOutcome::Failed { path, reason }) => {
                        summary.failed += 1;
                        pb.suspend(|| {
                            eprintln!("[extfix] {}: {}", path.display(), reason);
                        });
                    }
                    None => summary.unknown += 1,
                }
                pb.inc(1);
                pb.set_message(remaining.to_string());
            }
            Ok(WorkerEvent::WorkerDone) => workers_done += 1,
            Err(_) => break,
        }
    }

    let _ = feeder_handle.join();
    for (i, handle) in worker_handles.into_iter().enumerate() {
        if let Err(e) = handle.join() {
            eprintln!("[FATAL] Worker thread {} panicked: {:?}", i, e);
        }
    }

    let was_cancelled = !running.load(Ordering::SeqCst);
    pb.finish_and_clear();

    let elapsed = start_time.elapsed();

    println!("\n╔════════════════════════════════════════╗");
    if was_cancelled {
        println!("║        === Scan Interrupted ===        ║");
    } else {
        println!("║         === Scan Finished ===          ║");
    }
    println!("╠════════════════════════════════════════╣");
    println!(
        "║ Elapsed Time:       {:>18} ║",
        format!("{:.1}s", elapsed.as_secs_f64())
    );
    println!("║ Files Seen:         {:>18} ║", summary.total);
    println!("║ Renamed:            {:>18} ║", summary.renamed);
    println!("║ Already Correct:    {:>18} ║", summary.skipped);
    println!("║ Unrecognized:       {:>18} ║", summary.unknown);
    println!("║ Failed:             {:>18} ║", summary.failed);
    println!("╚════════════════════════════════════════╝");
    println!("\nDone.");

    Ok(summary)
}

fn worker_loop(
    task_rx: Receiver<PathBuf>,
    event_tx: Sender<WorkerEvent>,
    detector: &Detector,
    running: &AtomicBool,
) {
    for path in task_rx {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let outcome = process_file(&path, detector);
        if event_tx.send(WorkerEvent::FileDone(outcome)).is_err() {
            break;
        }
    }
    let _ = event_tx.send(WorkerEvent::WorkerDone);
}

/// Detects and renames one file. A read failure or an unrecognized header
/// yields `None`; both are contained here and never abort the run.
fn process_file(path: &Path, detector: &Detector) -> Option<RenameOutcome> {
    let window = HeaderWindow::read_from(path).ok()?;
    let format = detector.detect(window.bytes()).format()?;
    Some(renamer::apply(path, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn jpeg_bytes() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.extend_from_slice(&[0x10; 120]);
        data
    }

    fn mp4_bytes() -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftypisom");
        data.extend_from_slice(&[0x00; 52]);
        data
    }

    fn run_flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(true))
    }

    fn log_lines(root: &Path) -> Vec<String> {
        let content = fs::read_to_string(root.join(LOG_FILE_NAME)).unwrap_or_default();
        content.lines().map(str::to_owned).collect()
    }

    #[test]
    fn end_to_end_renames_by_signature() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo1.txt"), jpeg_bytes()).unwrap();
        fs::write(dir.path().join("video.dat"), mp4_bytes()).unwrap();
        fs::write(dir.path().join("blob.bin"), [0xDE, 0xAD, 0xBE, 0xEF].repeat(8)).unwrap();

        let summary = run(dir.path(), 4, run_flag()).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.renamed, 2);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.failed, 0);

        assert!(dir.path().join("photo1.jpg").exists());
        assert!(!dir.path().join("photo1.txt").exists());
        assert!(dir.path().join("video.mp4").exists());
        assert!(dir.path().join("blob.bin").exists());

        let lines = log_lines(dir.path());
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.starts_with("RENAMED: "), "malformed line: {}", line);
            assert!(line.contains(" -> "), "malformed line: {}", line);
        }
    }

    #[test]
    fn second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo1.txt"), jpeg_bytes()).unwrap();
        fs::write(dir.path().join("video.dat"), mp4_bytes()).unwrap();
        fs::write(dir.path().join("blob.bin"), [0xDE, 0xAD, 0xBE, 0xEF].repeat(8)).unwrap();

        let first = run(dir.path(), 4, run_flag()).unwrap();
        assert_eq!(first.renamed, 2);

        let second = run(dir.path(), 4, run_flag()).unwrap();
        assert_eq!(second.renamed, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.unknown, 1);

        // The log is append-only and gains nothing on the second pass.
        assert_eq!(log_lines(dir.path()).len(), 2);
    }

    #[test]
    fn more_files_than_workers_yields_one_outcome_each() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            fs::write(dir.path().join(format!("f{:02}.dat", i)), jpeg_bytes()).unwrap();
        }

        let summary = run(dir.path(), 4, run_flag()).unwrap();

        assert_eq!(summary.total, 20);
        assert_eq!(summary.renamed, 20);
        assert_eq!(log_lines(dir.path()).len(), 20);
        for i in 0..20 {
            assert!(dir.path().join(format!("f{:02}.jpg", i)).exists());
        }
    }

    #[test]
    fn collision_is_reported_not_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shot.dat"), jpeg_bytes()).unwrap();
        fs::write(dir.path().join("shot.jpg"), jpeg_bytes()).unwrap();

        let summary = run(dir.path(), 2, run_flag()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(dir.path().join("shot.dat").exists());
        assert!(dir.path().join("shot.jpg").exists());
        assert!(log_lines(dir.path()).is_empty());
    }

    #[test]
    fn failed_files_do_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.dat"), jpeg_bytes()).unwrap();
        fs::write(dir.path().join("a.jpg"), jpeg_bytes()).unwrap();
        fs::write(dir.path().join("b.dat"), jpeg_bytes()).unwrap();

        let summary = run(dir.path(), 2, run_flag()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.renamed, 1);
        assert!(dir.path().join("b.jpg").exists());
    }

    #[test]
    fn cancelled_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo1.txt"), jpeg_bytes()).unwrap();

        let summary = run(dir.path(), 2, Arc::new(AtomicBool::new(false))).unwrap();

        assert_eq!(summary.renamed, 0);
        assert!(dir.path().join("photo1.txt").exists());
        assert!(log_lines(dir.path()).is_empty());
    }

    #[test]
    fn empty_directory_completes() {
        let dir = TempDir::new().unwrap();
        let summary = run(dir.path(), 4, run_flag()).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.renamed, 0);
    }
}
