mod build;
mod context;
mod run;

use dockhand_api::{ApiClient, PlatformApi, TcpRendezvous};
use dockhand_build::{ConnectionDescriptor, DockerfileGenerator, database, env, release};
use dockhand_core::DockhandConfig;

/// Environment variable holding the platform API key.
pub(crate) const API_KEY_VAR: &str = "HEROKU_API_KEY";

pub use build::build;
pub use context::context;
pub use run::run;

/// Build the API client from config + environment.
pub(crate) fn api_client(config: &DockhandConfig) -> anyhow::Result<ApiClient> {
    let api_key = std::env::var(API_KEY_VAR)
        .map_err(|_| anyhow::anyhow!("{API_KEY_VAR} is not set — export your platform API key"))?;
    Ok(ApiClient::new(config.platform.api_url.clone(), api_key))
}

/// Synthesize the build context files for `app`: the Dockerfile and the
/// boot-time database config template. Shared by `build` and `context`.
pub(crate) async fn synthesize(
    config: &DockhandConfig,
    api: &ApiClient,
    app: &str,
    base: Option<&str>,
) -> anyhow::Result<(String, String)> {
    tracing::debug!(app, "synthesizing build context");

    let resolved = release::resolve_release(api, app, base).await?;

    let rendezvous = TcpRendezvous;
    let injected = env::resolve_injected_env(api, &rendezvous, &config.env, app).await?;

    // Fail fast on a malformed DATABASE_URL instead of at container boot.
    let config_vars = api.get_config_vars(app).await?;
    if let Some(url) = config_vars.get("DATABASE_URL") {
        ConnectionDescriptor::parse(url)?;
    }

    let database_config = database::boot_template().to_owned();
    let dockerfile = DockerfileGenerator::new(
        &resolved.base_image,
        &resolved.slug_url,
        &resolved.command,
        &injected,
    )
    .render();

    Ok((dockerfile, database_config))
}
