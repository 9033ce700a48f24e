//! Typed platform API client and rendezvous capture.
//!
//! API responses are decoded once, at this boundary, into the records in
//! [`records`]; missing required fields fail the decode instead of leaking
//! untyped JSON into the rest of the pipeline. The attach/rendezvous session
//! used to snapshot a live process environment lives behind the
//! [`Rendezvous`] trait so resolvers can be tested without a network.

pub mod client;
pub mod error;
pub mod records;
pub mod rendezvous;

pub use client::{ApiClient, PlatformApi};
pub use error::ApiError;
pub use records::{App, AttachedDyno, Blob, ConfigVars, Formation, Release, Slug, SlugRef};
pub use rendezvous::{Rendezvous, RendezvousError, TcpRendezvous};
