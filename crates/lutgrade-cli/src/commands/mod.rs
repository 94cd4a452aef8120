//! CLI command implementations

pub mod batch;
pub mod grade;
pub mod info;

use anyhow::{Context, Result};
use lutgrade_core::ImageBuf;
use lutgrade_engine::{
    MemoryGuard, PassthroughWatermark, ProcessingParams, Scheduler, WatermarkCompositor,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Load an image from a path.
pub fn load_image(path: &Path) -> Result<ImageBuf> {
    lutgrade_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save an image to a path.
pub fn save_image(path: &Path, image: &ImageBuf, quality: u8) -> Result<()> {
    lutgrade_io::write(path, image, quality)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Default output name: `<input-stem>-<lut-stem>.jpg` next to the input.
pub fn default_output_path(input: &Path, lut: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let look = lut.file_stem().and_then(|s| s.to_str()).unwrap_or("graded");
    input.with_file_name(format!("{stem}-{look}.jpg"))
}

/// Grades one image through the scheduler and writes the result.
///
/// Blocks until the task completes. The graded output passes through the
/// watermark seam and the memory guard before encoding.
pub fn grade_one(
    scheduler: &Scheduler,
    input: &Path,
    output: &Path,
    params: ProcessingParams,
    verbose: bool,
) -> Result<()> {
    let image = load_image(input)?;
    let (tx, rx) = mpsc::channel();

    let accepted = scheduler.submit(
        image,
        params,
        move |p| {
            if verbose {
                eprint!("\r  {:>5.1}%", p.percent());
                if p.completed == p.total {
                    eprintln!();
                }
            }
        },
        move |result| {
            let _ = tx.send(result);
        },
    );
    anyhow::ensure!(accepted, "a grading task is already running");

    let graded = rx
        .recv()
        .context("grading task dropped without completing")??;
    let graded = PassthroughWatermark.composite(graded)?;

    let (graded, resized) = MemoryGuard::default().constrain(graded)?;
    if let Some(event) = resized {
        eprintln!(
            "note: output downsampled {}x{} -> {}x{} to stay under the pixel ceiling",
            event.from.0, event.from.1, event.to.0, event.to.1
        );
    }

    save_image(output, &graded, params.quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let out = default_output_path(Path::new("shots/photo.png"), Path::new("looks/teal.cube"));
        assert_eq!(out, Path::new("shots/photo-teal.jpg"));
    }

    #[test]
    fn test_default_output_path_no_parent() {
        let out = default_output_path(Path::new("photo.jpg"), Path::new("warm.3dl"));
        assert_eq!(out, Path::new("photo-warm.jpg"));
    }
}
