//! Single-photo grading command

use crate::{GradeArgs, LookArgs};
use anyhow::{Context, Result};
use lutgrade_engine::{EngineConfig, ProcessingParams, Scheduler};
use std::fs::File;
use tracing::debug;

pub fn run(args: GradeArgs, verbose: bool) -> Result<()> {
    let scheduler = build_scheduler(&args.look)?;
    let params = build_params(&args.look);

    let output = args
        .output
        .unwrap_or_else(|| super::default_output_path(&args.input, &args.look.lut));

    if verbose {
        let info = scheduler.processor_info();
        println!(
            "Grading {} -> {} ({} backend, {} threads)",
            args.input.display(),
            output.display(),
            info.preferred.name(),
            info.threads
        );
    }

    super::grade_one(&scheduler, &args.input, &output, params, verbose)?;
    scheduler.release();

    if verbose {
        println!("Done.");
    }
    Ok(())
}

/// Builds a scheduler with the requested LUTs loaded.
pub fn build_scheduler(look: &LookArgs) -> Result<Scheduler> {
    let scheduler = Scheduler::new(EngineConfig {
        preference: look.processor.into(),
        disable_accelerated: false,
    });

    let file = File::open(&look.lut)
        .with_context(|| format!("Failed to open LUT: {}", look.lut.display()))?;
    scheduler
        .load_lut(file)
        .with_context(|| format!("Failed to parse LUT: {}", look.lut.display()))?;

    if let Some(lut2) = &look.lut2 {
        let file = File::open(lut2)
            .with_context(|| format!("Failed to open LUT: {}", lut2.display()))?;
        let usable = scheduler
            .load_secondary_lut(file)
            .with_context(|| format!("Failed to read LUT: {}", lut2.display()))?;
        if !usable {
            eprintln!(
                "warning: secondary LUT {} is unusable, grading with the primary only",
                lut2.display()
            );
        }
    }

    debug!(lut = ?look.lut, lut2 = ?look.lut2, "scheduler ready");
    Ok(scheduler)
}

/// Maps CLI look arguments onto engine parameters.
pub fn build_params(look: &LookArgs) -> ProcessingParams {
    ProcessingParams {
        strength: look.strength,
        lut2_strength: if look.lut2.is_some() {
            look.lut2_strength
        } else {
            0.0
        },
        quality: look.quality,
        dither: look.dither.into(),
    }
    .clamped()
}
