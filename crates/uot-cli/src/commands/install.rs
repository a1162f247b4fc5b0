//! Download and install models from the remote package index.

use anyhow::{Result, bail};
use log::{debug, info, warn};

use uot::{IndexClient, ModelStore};

pub async fn run() -> Result<()> {
    let store = ModelStore::from_env();
    let client = IndexClient::new()?;

    eprintln!("Fetching package index...");
    let catalog = client.fetch_catalog().await?;

    let mut installed = 0usize;
    let mut present = 0usize;
    let mut failed = 0usize;

    for descriptor in &catalog.models {
        if store.contains(descriptor) {
            debug!("{} already installed", descriptor.filename());
            present += 1;
            continue;
        }

        match client.download(descriptor).await {
            Ok(bytes) => match store.install(descriptor, &bytes) {
                Ok(path) => {
                    info!("installed {} -> {}", descriptor, path.display());
                    installed += 1;
                }
                Err(err) => {
                    warn!("failed to store {}: {}", descriptor.filename(), err);
                    failed += 1;
                }
            },
            Err(err) => {
                warn!("failed to download {}: {}", descriptor.filename(), err);
                failed += 1;
            }
        }
    }

    println!(
        "Installed {} models into '{}' ({} already present, {} failed, {} index entries skipped)",
        installed,
        store.root().display(),
        present,
        failed,
        catalog.skipped
    );

    if failed > 0 {
        bail!("{} models failed to install", failed);
    }
    Ok(())
}
