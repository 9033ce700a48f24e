use serde::{Deserialize, Serialize};

/// dockhand.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockhandConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub env: EnvPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Which environment variables survive into a built image.
///
/// A captured live environment is a superset of the app's config vars plus
/// whatever the platform runtime injected into the process. Config-var keys
/// are removed (the container gets those at run time), unless listed in
/// `keep`; keys in `strip` are removed unconditionally.
///
/// The exact membership of both lists is platform-tuned, so it is plain
/// configuration data rather than a rule baked into the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvPolicy {
    /// Keys kept even when they duplicate a config var
    #[serde(default = "default_keep")]
    pub keep: Vec<String>,
    /// Process-identity keys that must never land in an image
    #[serde(default = "default_strip")]
    pub strip: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Default for EnvPolicy {
    fn default() -> Self {
        Self {
            keep: default_keep(),
            strip: default_strip(),
        }
    }
}

impl EnvPolicy {
    pub fn is_kept(&self, key: &str) -> bool {
        self.keep.iter().any(|k| k == key)
    }

    pub fn is_stripped(&self, key: &str) -> bool {
        self.strip.iter().any(|k| k == key)
    }
}

impl DockhandConfig {
    /// Load from dockhand.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("dockhand.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

fn default_api_url() -> String {
    "https://api.heroku.com".to_owned()
}

fn default_keep() -> Vec<String> {
    vec!["PATH".to_owned()]
}

fn default_strip() -> Vec<String> {
    ["DYNO", "_", "OLDPWD", "SHLVL"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}
