use std::path::Path;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// User containers execute as. Slugs are chowned to this user at build time.
pub const RUNTIME_USER: &str = "nobody";

/// Container engine operations, parameterized over the executor for testability.
pub struct DockerDriver<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerDriver<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for DockerDriver<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DockerExecutor> DockerDriver<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Build an image from a materialized context directory.
    pub async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), EngineError> {
        let dir = context_dir
            .to_str()
            .ok_or_else(|| EngineError::InvalidPath(context_dir.to_path_buf()))?;

        tracing::debug!(tag, dir, "invoking docker build");
        self.executor
            .exec_streaming(&args(["build", "-t", tag, dir]))
            .await
            .map_err(|e| EngineError::Build { source: e })
    }

    /// Run a container from `image` with its environment loaded from
    /// `env_file`. Interactive unless `detached`; detached mode returns the
    /// container id the engine printed. `extra_args` is appended verbatim
    /// after the image, reaching the container entrypoint untouched.
    pub async fn run(
        &self,
        image: &str,
        env_file: &Path,
        detached: bool,
        extra_args: &[String],
    ) -> Result<Option<String>, EngineError> {
        let env_file = env_file
            .to_str()
            .ok_or_else(|| EngineError::InvalidPath(env_file.to_path_buf()))?;

        let mut cmd: Vec<String> = vec!["run".to_owned()];
        if detached {
            cmd.push("-d".to_owned());
        } else {
            cmd.push("-it".to_owned());
        }
        cmd.push("-P".to_owned());
        cmd.push("-u".to_owned());
        cmd.push(RUNTIME_USER.to_owned());
        cmd.push(format!("--env-file={env_file}"));
        cmd.push(image.to_owned());
        cmd.extend_from_slice(extra_args);

        tracing::debug!(image, detached, "invoking docker run");
        if detached {
            let output = self
                .executor
                .exec(&cmd)
                .await
                .map_err(|e| EngineError::Run { source: e })?;
            Ok(Some(output.trim().to_owned()))
        } else {
            self.executor
                .exec_streaming(&cmd)
                .await
                .map_err(|e| EngineError::Run { source: e })?;
            Ok(None)
        }
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("image build failed")]
    Build { source: DockerError },

    #[error("container run failed")]
    Run { source: DockerError },
}
