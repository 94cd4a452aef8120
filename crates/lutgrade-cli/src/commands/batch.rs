//! Batch grading command

use crate::BatchArgs;
use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    let files: Vec<PathBuf> = glob::glob(&args.pattern)?.filter_map(|r| r.ok()).collect();
    if files.is_empty() {
        bail!("No files match pattern: {}", args.pattern);
    }

    if verbose {
        println!("Found {} files matching '{}'", files.len(), args.pattern);
    }
    std::fs::create_dir_all(&args.output_dir)?;

    // One scheduler, one LUT load, for the whole run. The scheduler is
    // single-flight, so files go through it one at a time; rayon
    // parallelism lives inside each grade.
    let scheduler = super::grade::build_scheduler(&args.look)?;
    let params = super::grade::build_params(&args.look);

    let mut success = 0usize;
    let mut failed = 0usize;
    for input in &files {
        let name = super::default_output_path(input, &args.look.lut);
        let output = match name.file_name() {
            Some(f) => args.output_dir.join(f),
            None => {
                failed += 1;
                eprintln!("Error: cannot derive output name for {}", input.display());
                continue;
            }
        };
        match super::grade_one(&scheduler, input, &output, params, false) {
            Ok(()) => {
                success += 1;
                if verbose {
                    println!("  {} -> {}", input.display(), output.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {:#}", input.display(), e);
            }
        }
    }
    scheduler.release();

    info!(success, failed, "batch complete");
    println!("Processed: {success} success, {failed} failed");
    if failed > 0 {
        bail!("{failed} files failed");
    }
    Ok(())
}
