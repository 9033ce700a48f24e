//! Build-context materialization.
//!
//! A context is an ephemeral directory holding exactly the files the engine
//! build needs: `Dockerfile` and `database.yml`. The directory is removed
//! when the handle drops, on every exit path, including an engine failure
//! partway through. A portable tar.gz variant exists for consumers that
//! cannot invoke the engine locally.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

const DOCKERFILE_NAME: &str = "Dockerfile";
const DATABASE_CONFIG_NAME: &str = "database.yml";

/// An ephemeral build-context directory. Dropping the handle removes the
/// directory recursively.
pub struct BuildContext {
    dir: TempDir,
}

impl BuildContext {
    pub fn materialize(dockerfile: &str, database_config: &str) -> Result<Self, ContextError> {
        let dir = TempDir::with_prefix("dockhand-").map_err(|e| ContextError::Create {
            source: e,
        })?;

        write_file(dir.path(), DOCKERFILE_NAME, dockerfile)?;
        write_file(dir.path(), DATABASE_CONFIG_NAME, database_config)?;

        tracing::debug!(path = %dir.path().display(), "materialized build context");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Write the same two context files as a gzipped tar at `out_path`, for
/// handing to a remote build service instead of a local engine.
pub fn write_archive(
    dockerfile: &str,
    database_config: &str,
    out_path: &Path,
) -> Result<(), ContextError> {
    let file = File::create(out_path).map_err(|e| ContextError::WriteFile {
        path: out_path.to_path_buf(),
        source: e,
    })?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut archive = tar::Builder::new(encoder);

    append_entry(&mut archive, out_path, DOCKERFILE_NAME, dockerfile)?;
    append_entry(&mut archive, out_path, DATABASE_CONFIG_NAME, database_config)?;

    archive
        .into_inner()
        .and_then(GzEncoder::finish)
        .map_err(|e| ContextError::WriteFile {
            path: out_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Write a `NAME=VALUE` env file for the engine's run subcommand.
/// Lines come out sorted by name (the map iterates in key order).
pub fn write_env_file(
    dir: &Path,
    config_vars: &BTreeMap<String, String>,
) -> Result<PathBuf, ContextError> {
    let path = dir.join(".env");
    let mut contents = String::new();
    for (name, value) in config_vars {
        contents.push_str(name);
        contents.push('=');
        contents.push_str(value);
        contents.push('\n');
    }
    std::fs::write(&path, contents).map_err(|e| ContextError::WriteFile {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<(), ContextError> {
    let path = dir.join(name);
    std::fs::write(&path, contents).map_err(|e| ContextError::WriteFile {
        path,
        source: e,
    })
}

fn append_entry<W: Write>(
    archive: &mut tar::Builder<W>,
    out_path: &Path,
    name: &str,
    contents: &str,
) -> Result<(), ContextError> {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    archive
        .append_data(&mut header, name, contents.as_bytes())
        .map_err(|e| ContextError::WriteFile {
            path: out_path.to_path_buf(),
            source: e,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to create build-context directory")]
    Create { source: std::io::Error },

    #[error("failed to write {path}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
