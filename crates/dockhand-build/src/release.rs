//! Release resolution: which base image, which slug, which start command.

use dockhand_api::{ApiError, PlatformApi};

/// Known stack families and their container base images. The family is the
/// part of the stack identifier before the first `-`, so every
/// `bamboo-*` stack shares one image.
const STACK_IMAGES: &[(&str, &str)] = &[
    ("bamboo", "ddollar/heroku-bamboo"),
    ("cedar", "heroku/cedar:14"),
];

/// Process type whose command becomes the container CMD.
pub const WEB_PROCESS: &str = "web";

/// CMD when the formation declares no web process.
pub const FALLBACK_COMMAND: &str = "bash";

/// Everything the Dockerfile renderer needs from the app's latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub base_image: String,
    pub slug_url: String,
    pub command: String,
}

/// Map a stack identifier to its base image.
pub fn base_image_for_stack(stack: &str) -> Result<String, ReleaseError> {
    let family = stack.split('-').next().unwrap_or(stack);
    STACK_IMAGES
        .iter()
        .find(|(known, _)| *known == family)
        .map(|(_, image)| (*image).to_owned())
        .ok_or_else(|| ReleaseError::UnsupportedStack {
            stack: stack.to_owned(),
        })
}

/// Resolve the latest release of `app`.
///
/// An explicit `base_override` wins unconditionally; the stack mapping is
/// not consulted (and the app record is not even fetched).
pub async fn resolve_release<A: PlatformApi>(
    api: &A,
    app: &str,
    base_override: Option<&str>,
) -> Result<ResolvedRelease, ReleaseError> {
    let base_image = match base_override {
        Some(base) => base.to_owned(),
        None => {
            let info = api.get_app(app).await?;
            base_image_for_stack(&info.stack)?
        }
    };

    let releases = api.get_releases(app).await?;
    let latest = releases
        .into_iter()
        .max_by_key(|release| release.version)
        .ok_or_else(|| ReleaseError::NoReleases {
            app: app.to_owned(),
        })?;
    tracing::debug!(app, version = latest.version, "selected latest release");

    let slug = api.get_slug(app, &latest.slug.id).await?;

    let command = api
        .get_formation(app)
        .await?
        .into_iter()
        .find(|entry| entry.process_type == WEB_PROCESS)
        .map(|entry| entry.command)
        .unwrap_or_else(|| FALLBACK_COMMAND.to_owned());

    Ok(ResolvedRelease {
        base_image,
        slug_url: slug.blob.url,
        command,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("unsupported stack: {stack}")]
    UnsupportedStack { stack: String },

    #[error("app {app} has no releases")]
    NoReleases { app: String },

    #[error("failed to query the platform API")]
    Api {
        #[from]
        source: ApiError,
    },
}
