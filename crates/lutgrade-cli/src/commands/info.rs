//! LUT description command

use crate::InfoArgs;
use anyhow::{Context, Result};
use lutgrade_lut::LutStore;
use std::fs::File;

pub fn run(args: InfoArgs) -> Result<()> {
    // Goes through the store so the format sniffing matches what grading
    // would do with the same file.
    let mut store = LutStore::new();
    for path in &args.luts {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        store
            .load(file)
            .with_context(|| format!("Failed to parse: {}", path.display()))?;
        let snapshot = store.snapshot();
        let lut = snapshot
            .primary
            .as_ref()
            .context("LUT loaded but missing from the store")?;
        println!("{}: {}", path.display(), lut.describe());
    }
    Ok(())
}
