use std::path::Path;

use dockhand_build::context::write_archive;
use dockhand_core::DockhandConfig;

/// Synthesize the same context as `build`, but emit it as a portable
/// tar.gz for consumers that cannot invoke the engine locally.
pub async fn context(app: &str, base: Option<&str>, tarfile: &Path) -> anyhow::Result<()> {
    let config = DockhandConfig::load(Path::new("."))?;
    let api = super::api_client(&config)?;

    let (dockerfile, database_config) = super::synthesize(&config, &api, app, base).await?;

    write_archive(&dockerfile, &database_config, tarfile)?;

    println!("Wrote build context to {}", tarfile.display());
    Ok(())
}
