//! One-shot rendezvous sessions.
//!
//! An attached one-off process is reachable through a rendezvous endpoint:
//! a short-lived TCP stream, activated by writing the session secret (the
//! final path segment of the attach URL). The remote side then emits the
//! process output and closes. We read to EOF and hand the text back;
//! interpreting the `NAME=VALUE` lines is the resolver's job.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use url::Url;

/// Abstraction over rendezvous capture for testability.
#[allow(async_fn_in_trait)]
pub trait Rendezvous: Send + Sync {
    /// Open the session at `attach_url` and read its output to EOF.
    async fn capture(&self, attach_url: &str) -> Result<String, RendezvousError>;
}

/// Real rendezvous client over TCP.
pub struct TcpRendezvous;

impl Rendezvous for TcpRendezvous {
    async fn capture(&self, attach_url: &str) -> Result<String, RendezvousError> {
        let (host, port, secret) = parse_attach_url(attach_url)?;

        tracing::debug!(host, port, "connecting to rendezvous endpoint");
        let mut stream =
            TcpStream::connect((host.as_str(), port))
                .await
                .map_err(|e| RendezvousError::Connect {
                    endpoint: format!("{host}:{port}"),
                    source: e,
                })?;

        stream
            .write_all(format!("{secret}\n").as_bytes())
            .await
            .map_err(|e| RendezvousError::Io { source: e })?;

        let mut buffer = Vec::new();
        stream
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| RendezvousError::Io { source: e })?;

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Split an attach URL into host, port, and session secret.
fn parse_attach_url(attach_url: &str) -> Result<(String, u16, String), RendezvousError> {
    let url = Url::parse(attach_url).map_err(|e| RendezvousError::InvalidUrl {
        url: attach_url.to_owned(),
        source: e,
    })?;

    let host = url
        .host_str()
        .ok_or_else(|| RendezvousError::MissingComponent {
            url: attach_url.to_owned(),
            component: "host",
        })?
        .to_owned();

    let port = url
        .port()
        .ok_or_else(|| RendezvousError::MissingComponent {
            url: attach_url.to_owned(),
            component: "port",
        })?;

    let secret = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RendezvousError::MissingComponent {
            url: attach_url.to_owned(),
            component: "session secret",
        })?
        .to_owned();

    Ok((host, port, secret))
}

#[derive(Debug, thiserror::Error)]
pub enum RendezvousError {
    #[error("invalid rendezvous URL {url:?}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("rendezvous URL {url:?} has no {component}")]
    MissingComponent {
        url: String,
        component: &'static str,
    },

    #[error("failed to connect to rendezvous endpoint {endpoint}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("rendezvous session I/O failed")]
    Io { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_host_port_and_secret() {
        let (host, port, secret) =
            parse_attach_url("rendezvous://rendezvous.example.com:5000/abc123secret").unwrap();
        assert_eq!(host, "rendezvous.example.com");
        assert_eq!(port, 5000);
        assert_eq!(secret, "abc123secret");
    }

    #[test]
    fn parse_rejects_url_without_port() {
        let result = parse_attach_url("rendezvous://rendezvous.example.com/abc");
        assert!(matches!(
            result,
            Err(RendezvousError::MissingComponent {
                component: "port",
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_url_without_secret() {
        let result = parse_attach_url("rendezvous://rendezvous.example.com:5000/");
        assert!(matches!(
            result,
            Err(RendezvousError::MissingComponent {
                component: "session secret",
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_attach_url("not a url at all"),
            Err(RendezvousError::InvalidUrl { .. })
        ));
    }
}
