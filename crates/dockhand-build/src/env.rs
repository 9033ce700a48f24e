//! Injected-environment resolution.
//!
//! A built image needs the environment the platform runtime gave the app
//! beyond its own config vars (PATH, HOME, runtime locations). We snapshot a
//! live process over a rendezvous session, subtract the config vars (those
//! are delivered at run time), apply the [`EnvPolicy`], and overlay the
//! container-specific values.

use std::collections::BTreeMap;

use dockhand_api::{ApiError, PlatformApi, Rendezvous, RendezvousError};
use dockhand_core::EnvPolicy;

/// Process-slot marker injected into every image.
pub const PROCESS_SLOT_VAR: (&str, &str) = ("PS", "docker.1");

/// Port the containerized app listens on. Also the Dockerfile EXPOSE port.
pub const CONTAINER_PORT: u16 = 5000;

/// Rack bootstrap location variable, rewritten when present in the live env.
pub const RACK_CONFIG_VAR: &str = "HEROKU_RACK";

/// In-container location of the rack bootstrap file.
pub const RACK_CONFIG_PATH: &str = "/home/heroku_rack/heroku.ru";

/// Parse `NAME=VALUE` lines from a rendezvous capture.
///
/// Values are split on the first `=` only; lines without a delimiter are
/// not environment entries and are skipped.
pub fn parse_env_lines(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| {
            line.split_once('=')
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Resolve the environment to bake into an image for `app`.
///
/// The returned map iterates in sorted key order, so rendering it is
/// deterministic. A rendezvous failure is an error, never an empty result.
pub async fn resolve_injected_env<A: PlatformApi, R: Rendezvous>(
    api: &A,
    rendezvous: &R,
    policy: &EnvPolicy,
    app: &str,
) -> Result<BTreeMap<String, String>, EnvError> {
    let dyno = api.spawn_env_probe(app).await?;
    let captured = rendezvous.capture(&dyno.attach_url).await?;
    let mut env = parse_env_lines(&captured);
    tracing::debug!(app, captured = env.len(), "captured live environment");

    let config_vars = api.get_config_vars(app).await?;
    for key in config_vars.keys() {
        if !policy.is_kept(key) {
            env.remove(key);
        }
    }

    env.retain(|key, _| !policy.is_stripped(key));

    env.insert(
        PROCESS_SLOT_VAR.0.to_owned(),
        PROCESS_SLOT_VAR.1.to_owned(),
    );
    env.insert("PORT".to_owned(), CONTAINER_PORT.to_string());
    if env.contains_key(RACK_CONFIG_VAR) {
        env.insert(RACK_CONFIG_VAR.to_owned(), RACK_CONFIG_PATH.to_owned());
    }

    Ok(env)
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("failed to query the platform API")]
    Api {
        #[from]
        source: ApiError,
    },

    #[error("failed to capture the live process environment")]
    Rendezvous {
        #[from]
        source: RendezvousError,
    },
}
