//! Build-context synthesis: from a platform release to a directory (or
//! archive) the container engine can build.
//!
//! # Build pipeline
//!
//! ```text
//! dockhand build
//!   1. Release    ── stack → base image, max-version release → slug URL,
//!                    formation "web" → start command
//!   2. Environment ── live env probe minus config vars, policy applied,
//!                    container overrides injected
//!   3. database.yml ── boot-time template artifact (values resolved by the
//!                    app runtime from DATABASE_URL, not at build time)
//!   4. Dockerfile  ── DockerfileGenerator::render()
//!   5. Context     ── BuildContext::materialize() → docker build
//! ```
//!
//! # Determinism
//!
//! Identical inputs produce byte-identical Dockerfiles: injected environment
//! keys are carried in a `BTreeMap` and emitted in sorted order, and the
//! instruction sequence is fixed.

pub mod context;
pub mod database;
pub mod dockerfile;
pub mod env;
pub mod release;

pub use context::BuildContext;
pub use database::ConnectionDescriptor;
pub use dockerfile::DockerfileGenerator;
pub use release::ResolvedRelease;
