//! Coordinator endpoint parsing.

use std::net::SocketAddr;

/// URL scheme prefix used by OSC-over-UDP endpoints.
pub const UDP_SCHEME: &str = "osc.udp://";

/// Endpoint error.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("resolve udp remote address: {source}")]
    Resolve {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("resolve udp remote address: no address for {0}")]
    NoAddress(String),
}

/// Strip the `osc.udp://` scheme and a trailing slash, leaving `host:port`.
#[must_use]
pub fn host_port(url: &str) -> &str {
    let url = url.trim();
    let url = url.strip_prefix(UDP_SCHEME).unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url)
}

/// Resolve an endpoint URL to a socket address.
///
/// # Errors
/// Returns error if the host cannot be resolved or has no port.
pub async fn resolve(url: &str) -> Result<SocketAddr, EndpointError> {
    let target = host_port(url);
    let mut addrs = tokio::net::lookup_host(target)
        .await
        .map_err(|source| EndpointError::Resolve {
            url: url.to_string(),
            source,
        })?;
    addrs
        .next()
        .ok_or_else(|| EndpointError::NoAddress(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_port_strips_scheme_and_slash() {
        assert_eq!(host_port("osc.udp://localhost:15000/"), "localhost:15000");
        assert_eq!(host_port("osc.udp://127.0.0.1:15000"), "127.0.0.1:15000");
        assert_eq!(host_port("127.0.0.1:15000/"), "127.0.0.1:15000");
        assert_eq!(host_port("127.0.0.1:15000"), "127.0.0.1:15000");
    }

    #[tokio::test]
    async fn test_resolve_ip_url() {
        let addr = tokio_test::assert_ok!(resolve("osc.udp://127.0.0.1:15000/").await);
        assert_eq!(addr, "127.0.0.1:15000".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_missing_port() {
        let err = tokio_test::assert_err!(resolve("garbage").await);
        assert!(matches!(err, EndpointError::Resolve { .. }));
        assert!(err.to_string().starts_with("resolve udp remote address"));
    }
}
