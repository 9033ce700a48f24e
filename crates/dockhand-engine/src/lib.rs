//! Narrow port over the local container engine.
//!
//! Two operations: build an image from a context directory, and run a
//! container from an image with an env file. Both are fire-and-forget:
//! the engine's exit status is the only signal, no output is parsed.

pub mod docker;
pub mod driver;
pub mod executor;

pub use docker::DockerError;
pub use driver::{DockerDriver, EngineError, RUNTIME_USER};
pub use executor::{DockerExecutor, RealExecutor};
