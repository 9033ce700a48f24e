use std::path::Path;

use dockhand_build::BuildContext;
use dockhand_core::DockhandConfig;
use dockhand_engine::DockerDriver;

/// Execute the full build pipeline: resolve the release, synthesize the
/// context, hand it to the engine. The context directory is removed on
/// every exit path, including an engine failure.
pub async fn build(app: &str, base: Option<&str>, tag: Option<&str>) -> anyhow::Result<()> {
    let config = DockhandConfig::load(Path::new("."))?;
    let api = super::api_client(&config)?;

    let (dockerfile, database_config) = super::synthesize(&config, &api, app, base).await?;

    let context = BuildContext::materialize(&dockerfile, &database_config)?;
    let tag = tag.unwrap_or(app);

    println!("Building image {tag}...");
    let driver = DockerDriver::new();
    driver.build(context.path(), tag).await?;

    println!("Built image {tag}");
    Ok(())
}
