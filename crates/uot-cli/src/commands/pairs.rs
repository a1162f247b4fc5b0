//! List installed language pairs.

use std::fs;

use anyhow::Result;

use uot::ModelStore;
use uot::languages::display_name;

use super::util::format_bytes;

pub fn run() -> Result<()> {
    let store = ModelStore::from_env();
    let models = store.list_installed()?;

    if models.is_empty() {
        println!("No models installed in '{}'.", store.root().display());
        println!("Run 'uot --im' to download models from the package index.");
        return Ok(());
    }

    println!("Installed language pairs in '{}':", store.root().display());
    println!();
    let mut total = 0u64;
    for model in &models {
        let size = fs::metadata(&model.path).map(|m| m.len()).unwrap_or(0);
        total += size;
        println!(
            "  {:<10} v{:<6} {:>9}   {} -> {}",
            model.pair.to_string(),
            model.version,
            format_bytes(size),
            display_name(&model.pair.from),
            display_name(&model.pair.to),
        );
    }
    println!();
    // The total covers the models listed above, not whatever else the
    // directory happens to hold.
    println!("{} models, {} total", models.len(), format_bytes(total));

    Ok(())
}
