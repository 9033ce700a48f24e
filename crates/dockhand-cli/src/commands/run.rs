use std::path::Path;

use dockhand_api::PlatformApi;
use dockhand_build::context::write_env_file;
use dockhand_core::DockhandConfig;
use dockhand_engine::DockerDriver;
use tempfile::TempDir;

/// Run an image with the app's config vars as its environment.
pub async fn run(
    app: &str,
    image: Option<&str>,
    detach: bool,
    extra_args: &[String],
) -> anyhow::Result<()> {
    let config = DockhandConfig::load(Path::new("."))?;
    let api = super::api_client(&config)?;

    let config_vars = api.get_config_vars(app).await?;

    let dir = TempDir::with_prefix("dockhand-")?;
    let env_file = write_env_file(dir.path(), &config_vars)?;

    let image = image.unwrap_or(app);
    let driver = DockerDriver::new();
    let container = driver.run(image, &env_file, detach, extra_args).await?;

    if let Some(id) = container {
        println!("{id}");
    }
    Ok(())
}
