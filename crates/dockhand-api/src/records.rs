//! Platform API records.
//!
//! Everything the build pipeline needs from the remote platform, decoded
//! with serde at the API boundary. Fields not listed here are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

/// App configuration variables, keyed by variable name.
///
/// A `BTreeMap` so that every serialization (env files, ENV directives)
/// iterates in sorted key order.
pub type ConfigVars = BTreeMap<String, String>;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: String,
    /// Stack identifier, e.g. "bamboo-mri-1.9.2". Drives base-image selection.
    pub stack: String,
}

/// One release of an app. `version` is monotonic and unique per app;
/// the latest release is the one with the maximum version.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub version: u64,
    pub slug: SlugRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlugRef {
    pub id: String,
}

/// A compiled slug: the app's code plus dependencies, downloadable as an
/// archive from `blob.url`.
#[derive(Debug, Clone, Deserialize)]
pub struct Slug {
    pub id: String,
    pub blob: Blob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    pub url: String,
}

/// One process type in the app's formation, e.g. `web: bundle exec thin start`.
#[derive(Debug, Clone, Deserialize)]
pub struct Formation {
    #[serde(rename = "type")]
    pub process_type: String,
    pub command: String,
}

/// A one-off attached process, reachable over its rendezvous endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachedDyno {
    pub attach_url: String,
}
