use crate::client::types::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default listener port on the workstation.
pub const DEFAULT_PORT: u16 = 8080;

/// Resolved target address for a workstation connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parse a user-supplied address: `host`, `host:port`, or a
    /// `ws://host[:port]` URL as carried by pairing QR codes.
    /// Bracketed IPv6 hosts are not supported.
    pub fn parse(address: &str) -> Result<Self, ClientError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidAddress("address is empty".into()));
        }
        let rest = trimmed.strip_prefix("ws://").unwrap_or(trimmed);
        let rest = rest.trim_end_matches('/');
        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    ClientError::InvalidAddress(format!("invalid port in {trimmed:?}"))
                })?;
                (host, port)
            }
            None => (rest, DEFAULT_PORT),
        };
        if host.is_empty()
            || host.contains(|c: char| c.is_whitespace() || c == '/' || c == ':')
        {
            return Err(ClientError::InvalidAddress(format!(
                "invalid host in {trimmed:?}"
            )));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// WebSocket URL for the session channel.
    pub fn url(&self) -> String {
        format!("ws://{}:{}/ws", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        let ep = Endpoint::parse("192.168.1.20").unwrap();
        assert_eq!(ep.host, "192.168.1.20");
        assert_eq!(ep.port, DEFAULT_PORT);
    }

    #[test]
    fn host_with_port() {
        let ep = Endpoint::parse("workstation.local:9001").unwrap();
        assert_eq!(ep.host, "workstation.local");
        assert_eq!(ep.port, 9001);
    }

    #[test]
    fn qr_url_with_scheme() {
        let ep = Endpoint::parse("ws://10.0.0.5:8080/").unwrap();
        assert_eq!(ep.host, "10.0.0.5");
        assert_eq!(ep.port, 8080);
        assert_eq!(ep.url(), "ws://10.0.0.5:8080/ws");
    }

    #[test]
    fn empty_address_is_invalid() {
        assert!(matches!(
            Endpoint::parse(""),
            Err(ClientError::InvalidAddress(_))
        ));
        assert!(matches!(
            Endpoint::parse("   "),
            Err(ClientError::InvalidAddress(_))
        ));
    }

    #[test]
    fn bad_port_is_invalid() {
        assert!(matches!(
            Endpoint::parse("host:not-a-port"),
            Err(ClientError::InvalidAddress(_))
        ));
        assert!(matches!(
            Endpoint::parse("host:70000"),
            Err(ClientError::InvalidAddress(_))
        ));
    }

    #[test]
    fn hosts_with_spaces_or_paths_are_invalid() {
        assert!(Endpoint::parse("some host").is_err());
        assert!(Endpoint::parse("host/path:8080").is_err());
        assert!(Endpoint::parse("ws://").is_err());
    }
}
