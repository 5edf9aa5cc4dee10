//! URL security validation
//!
//! Validates untrusted URLs before any network connection is made. A URL is
//! accepted only if its scheme is on the allow-list, its host is not on the
//! block-list, and every address the host resolves to lies outside loopback,
//! private, link-local, multicast, and reserved ranges. The resolved
//! addresses are returned so the fetch layer can pin its connections to
//! them, closing the window for DNS rebinding between validation and fetch.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

/// Policy controlling which URLs are accepted for fetching
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    /// URL schemes accepted for fetching
    pub allowed_schemes: Vec<String>,
    /// Host names rejected before DNS resolution
    pub blocked_hosts: Vec<String>,
    /// Skip IP range checks (development only, blocked hosts still apply)
    pub allow_private_addresses: bool,
    /// Deadline for resolving a host; a stalled resolver must not block
    /// the request past the configured timeout
    pub resolve_timeout: Duration,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            blocked_hosts: vec!["localhost".to_string(), "0.0.0.0".to_string()],
            allow_private_addresses: false,
            resolve_timeout: Duration::from_secs(15),
        }
    }
}

/// Errors that can occur during URL security validation
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    /// URL could not be parsed or has no host
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// Why the URL was rejected
        reason: String,
    },
    /// URL scheme is not on the allow-list
    #[error("Scheme '{scheme}' is not allowed")]
    SchemeNotAllowed {
        /// The rejected scheme
        scheme: String,
    },
    /// Host name is on the block-list
    #[error("Host '{host}' is blocked")]
    BlockedHost {
        /// The blocked host
        host: String,
    },
    /// Host resolves to a non-public address
    #[error("Address {address} is in a prohibited range ({range})")]
    PrivateAddress {
        /// The prohibited address
        address: IpAddr,
        /// Name of the range the address falls in
        range: &'static str,
    },
    /// DNS resolution produced no usable addresses
    #[error("Failed to resolve host '{host}'")]
    Resolution {
        /// The host that did not resolve
        host: String,
    },
    /// DNS resolution did not complete within the deadline
    #[error("Timed out resolving host '{host}'")]
    ResolutionTimeout {
        /// The host whose resolution timed out
        host: String,
    },
}

/// A URL that passed validation, together with the addresses it resolved to
///
/// The fetch layer must connect only to these addresses.
#[derive(Debug, Clone)]
pub struct ValidatedUrl {
    /// The parsed URL
    pub url: Url,
    /// The host component, lowercased
    pub host: String,
    /// The port, explicit or scheme default
    pub port: u16,
    /// Addresses the host resolved to at validation time
    pub addresses: Vec<SocketAddr>,
}

/// Validates URLs against a [`SecurityPolicy`]
#[derive(Debug, Clone, Default)]
pub struct SecurityValidator {
    policy: SecurityPolicy,
}

impl SecurityValidator {
    /// Create a validator with the given policy
    pub fn new(policy: SecurityPolicy) -> Self {
        Self { policy }
    }

    /// Validate a raw URL string, resolving its host through DNS
    pub async fn validate_str(&self, raw_url: &str) -> Result<ValidatedUrl, SecurityError> {
        let url = Url::parse(raw_url).map_err(|e| SecurityError::InvalidUrl {
            url: raw_url.to_string(),
            reason: e.to_string(),
        })?;
        self.validate(&url).await
    }

    /// Validate a parsed URL, resolving its host through DNS
    ///
    /// Used for the initial request and again for every redirect target.
    pub async fn validate(&self, url: &Url) -> Result<ValidatedUrl, SecurityError> {
        let (host, port) = self.check_scheme_and_host(url)?;

        let addresses: Vec<SocketAddr> = if let Ok(ip) = host.parse::<IpAddr>() {
            vec![SocketAddr::new(ip, port)]
        } else {
            let lookup = tokio::net::lookup_host((host.clone(), port));
            match tokio::time::timeout(self.policy.resolve_timeout, lookup).await {
                Ok(resolved) => resolved
                    .map_err(|_| SecurityError::Resolution { host: host.clone() })?
                    .collect(),
                Err(_) => return Err(SecurityError::ResolutionTimeout { host }),
            }
        };

        self.validate_resolved(url, addresses)
    }

    /// Validate a parsed URL against a caller-supplied address set
    ///
    /// Skips DNS resolution; the scheme, host, and address range checks are
    /// identical to [`validate`](Self::validate).
    pub fn validate_resolved(
        &self,
        url: &Url,
        addresses: Vec<SocketAddr>,
    ) -> Result<ValidatedUrl, SecurityError> {
        let (host, port) = self.check_scheme_and_host(url)?;
        if addresses.is_empty() {
            return Err(SecurityError::Resolution { host });
        }
        self.check_addresses(&addresses)?;
        Ok(ValidatedUrl {
            url: url.clone(),
            host,
            port,
            addresses,
        })
    }

    fn check_scheme_and_host(&self, url: &Url) -> Result<(String, u16), SecurityError> {
        let scheme = url.scheme().to_lowercase();
        if !self.policy.allowed_schemes.iter().any(|s| s == &scheme) {
            return Err(SecurityError::SchemeNotAllowed { scheme });
        }

        let host = match url.host_str() {
            Some(host) => host.trim_end_matches('.').to_lowercase(),
            None => {
                return Err(SecurityError::InvalidUrl {
                    url: url.to_string(),
                    reason: "URL has no host".to_string(),
                })
            }
        };

        // IPv6 literals come back bracketed from host_str
        let bare_host = host.trim_start_matches('[').trim_end_matches(']').to_string();

        if self.policy.blocked_hosts.iter().any(|b| {
            let blocked = b.to_lowercase();
            bare_host == blocked || bare_host.ends_with(&format!(".{blocked}"))
        }) {
            return Err(SecurityError::BlockedHost { host: bare_host });
        }

        let port = url
            .port_or_known_default()
            .ok_or_else(|| SecurityError::InvalidUrl {
                url: url.to_string(),
                reason: "URL has no port".to_string(),
            })?;

        Ok((bare_host, port))
    }

    fn check_addresses(&self, addresses: &[SocketAddr]) -> Result<(), SecurityError> {
        if self.policy.allow_private_addresses {
            return Ok(());
        }
        // A single non-public address rejects the whole set: the connection
        // could land on any of them.
        for addr in addresses {
            let ip = normalize_ip(addr.ip());
            if let Some(range) = prohibited_range(ip) {
                return Err(SecurityError::PrivateAddress { address: ip, range });
            }
        }
        Ok(())
    }
}

/// Unwrap IPv4-mapped IPv6 addresses so range checks see the real target
fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => ip,
        },
        IpAddr::V4(_) => ip,
    }
}

/// Classify an address as non-public, returning the range name
///
/// Returns `None` for addresses that are safe to connect to.
fn prohibited_range(ip: IpAddr) -> Option<&'static str> {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            if v4.is_unspecified() {
                Some("unspecified")
            } else if v4.is_loopback() {
                Some("loopback")
            } else if v4.is_private() {
                Some("private")
            } else if v4.is_link_local() {
                Some("link-local")
            } else if v4.is_multicast() {
                Some("multicast")
            } else if v4.is_broadcast() {
                Some("broadcast")
            } else if octets[0] == 100 && (octets[1] & 0xc0) == 64 {
                // 100.64.0.0/10
                Some("carrier-grade NAT")
            } else if (octets[0] == 192 && octets[1] == 0 && octets[2] == 2)
                || (octets[0] == 198 && octets[1] == 51 && octets[2] == 100)
                || (octets[0] == 203 && octets[1] == 0 && octets[2] == 113)
            {
                Some("documentation")
            } else if octets[0] == 198 && (octets[1] & 0xfe) == 18 {
                // 198.18.0.0/15
                Some("benchmarking")
            } else if octets[0] >= 240 {
                // 240.0.0.0/4
                Some("reserved")
            } else {
                None
            }
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            if v6.is_unspecified() {
                Some("unspecified")
            } else if v6.is_loopback() {
                Some("loopback")
            } else if v6.is_multicast() {
                Some("multicast")
            } else if (segments[0] & 0xfe00) == 0xfc00 {
                // fc00::/7
                Some("unique-local")
            } else if (segments[0] & 0xffc0) == 0xfe80 {
                // fe80::/10
                Some("link-local")
            } else if segments[0] == 0x2001 && segments[1] == 0xdb8 {
                // 2001:db8::/32
                Some("documentation")
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn validator() -> SecurityValidator {
        SecurityValidator::new(SecurityPolicy::default())
    }

    fn addr(ip: &str) -> Vec<SocketAddr> {
        vec![SocketAddr::new(ip.parse().unwrap(), 80)]
    }

    #[test]
    fn test_https_url_with_public_address_accepted() {
        let url = Url::parse("https://example.com/page").unwrap();
        let validated = validator()
            .validate_resolved(&url, addr("93.184.216.34"))
            .unwrap();
        assert_eq!(validated.host, "example.com");
        assert_eq!(validated.port, 443);
        assert_eq!(validated.addresses.len(), 1);
    }

    #[test]
    fn test_scheme_not_allowed() {
        let url = Url::parse("ftp://example.com/file").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("93.184.216.34"))
            .unwrap_err();
        assert!(matches!(
            err,
            SecurityError::SchemeNotAllowed { scheme } if scheme == "ftp"
        ));
    }

    #[test]
    fn test_file_scheme_rejected() {
        let err = Url::parse("file:///etc/passwd").unwrap();
        let result = validator().validate_resolved(&err, addr("1.1.1.1"));
        assert!(matches!(
            result,
            Err(SecurityError::SchemeNotAllowed { .. })
        ));
    }

    #[test]
    fn test_blocked_host_localhost() {
        let url = Url::parse("http://localhost/admin").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("93.184.216.34"))
            .unwrap_err();
        assert!(matches!(err, SecurityError::BlockedHost { host } if host == "localhost"));
    }

    #[test]
    fn test_blocked_host_subdomain() {
        let url = Url::parse("http://foo.localhost/x").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("93.184.216.34"))
            .unwrap_err();
        assert!(matches!(err, SecurityError::BlockedHost { .. }));
    }

    #[test]
    fn test_blocked_host_case_insensitive() {
        let url = Url::parse("http://LOCALHOST/x").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("93.184.216.34"))
            .unwrap_err();
        assert!(matches!(err, SecurityError::BlockedHost { .. }));
    }

    #[test]
    fn test_loopback_address_rejected() {
        let url = Url::parse("http://evil.example.com/").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("127.0.0.1"))
            .unwrap_err();
        assert!(matches!(
            err,
            SecurityError::PrivateAddress { range: "loopback", .. }
        ));
    }

    #[test]
    fn test_private_ranges_rejected() {
        for ip in ["10.0.0.1", "172.16.0.1", "172.31.255.254", "192.168.1.1"] {
            let url = Url::parse("http://internal.example.com/").unwrap();
            let err = validator().validate_resolved(&url, addr(ip)).unwrap_err();
            assert!(
                matches!(err, SecurityError::PrivateAddress { range: "private", .. }),
                "expected private rejection for {ip}"
            );
        }
    }

    #[test]
    fn test_172_32_is_public() {
        // 172.32.0.0 is outside 172.16.0.0/12
        let url = Url::parse("http://example.com/").unwrap();
        assert!(validator().validate_resolved(&url, addr("172.32.0.1")).is_ok());
    }

    #[test]
    fn test_link_local_rejected() {
        let url = Url::parse("http://metadata.example.com/").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("169.254.169.254"))
            .unwrap_err();
        assert!(matches!(
            err,
            SecurityError::PrivateAddress { range: "link-local", .. }
        ));
    }

    #[test]
    fn test_multicast_broadcast_reserved_rejected() {
        let url = Url::parse("http://example.com/").unwrap();
        for (ip, range) in [
            ("224.0.0.1", "multicast"),
            ("255.255.255.255", "broadcast"),
            ("240.0.0.1", "reserved"),
            ("0.0.0.0", "unspecified"),
        ] {
            let err = validator().validate_resolved(&url, addr(ip)).unwrap_err();
            assert!(
                matches!(err, SecurityError::PrivateAddress { range: r, .. } if r == range),
                "expected {range} rejection for {ip}"
            );
        }
    }

    #[test]
    fn test_ipv6_loopback_rejected() {
        let url = Url::parse("http://example.com/").unwrap();
        let err = validator().validate_resolved(&url, addr("::1")).unwrap_err();
        assert!(matches!(
            err,
            SecurityError::PrivateAddress { range: "loopback", .. }
        ));
    }

    #[test]
    fn test_ipv6_unique_local_and_link_local_rejected() {
        let url = Url::parse("http://example.com/").unwrap();
        for (ip, range) in [
            ("fc00::1", "unique-local"),
            ("fd12:3456::1", "unique-local"),
            ("fe80::1", "link-local"),
        ] {
            let err = validator().validate_resolved(&url, addr(ip)).unwrap_err();
            assert!(
                matches!(err, SecurityError::PrivateAddress { range: r, .. } if r == range),
                "expected {range} rejection for {ip}"
            );
        }
    }

    #[test]
    fn test_ipv4_mapped_ipv6_unwrapped() {
        // ::ffff:127.0.0.1 must be treated as 127.0.0.1
        let url = Url::parse("http://example.com/").unwrap();
        let mapped = Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0x7f00, 0x0001);
        let err = validator()
            .validate_resolved(&url, vec![SocketAddr::new(IpAddr::V6(mapped), 80)])
            .unwrap_err();
        assert!(matches!(
            err,
            SecurityError::PrivateAddress {
                address: IpAddr::V4(v4),
                range: "loopback",
            } if v4 == Ipv4Addr::new(127, 0, 0, 1)
        ));
    }

    #[test]
    fn test_mixed_public_private_rejects_all() {
        // DNS answers with one public and one private address: reject
        let url = Url::parse("http://rebind.example.com/").unwrap();
        let addresses = vec![
            SocketAddr::new("93.184.216.34".parse().unwrap(), 80),
            SocketAddr::new("10.0.0.5".parse().unwrap(), 80),
        ];
        let err = validator().validate_resolved(&url, addresses).unwrap_err();
        assert!(matches!(err, SecurityError::PrivateAddress { .. }));
    }

    #[test]
    fn test_ip_literal_url_rejected() {
        let url = Url::parse("http://192.168.0.10/router").unwrap();
        // IP literals skip DNS; range check applies directly
        let err = validator()
            .validate_resolved(&url, addr("192.168.0.10"))
            .unwrap_err();
        assert!(matches!(err, SecurityError::PrivateAddress { .. }));
    }

    #[test]
    fn test_empty_address_set_is_resolution_failure() {
        let url = Url::parse("http://example.com/").unwrap();
        let err = validator().validate_resolved(&url, vec![]).unwrap_err();
        assert!(matches!(err, SecurityError::Resolution { .. }));
    }

    #[test]
    fn test_allow_private_addresses_skips_range_checks() {
        let permissive = SecurityValidator::new(SecurityPolicy {
            allow_private_addresses: true,
            ..SecurityPolicy::default()
        });
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        let validated = permissive
            .validate_resolved(&url, addr("127.0.0.1"))
            .unwrap();
        assert_eq!(validated.host, "127.0.0.1");

        // Blocked host literals still apply even in permissive mode
        let blocked = Url::parse("http://localhost:8080/").unwrap();
        assert!(matches!(
            permissive.validate_resolved(&blocked, addr("127.0.0.1")),
            Err(SecurityError::BlockedHost { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_string() {
        let result = validator().validate_str("not a url").await;
        assert!(matches!(result, Err(SecurityError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_resolution_deadline_enforced() {
        // With a zero deadline the resolver can never win the race, so a
        // hostname lookup must surface the timeout instead of blocking
        let strict = SecurityValidator::new(SecurityPolicy {
            resolve_timeout: Duration::ZERO,
            ..SecurityPolicy::default()
        });
        let url = Url::parse("https://example.com/").unwrap();
        let err = strict.validate(&url).await.unwrap_err();
        assert!(matches!(err, SecurityError::ResolutionTimeout { .. }));
    }

    #[tokio::test]
    async fn test_ip_literal_skips_dns() {
        // An IP literal never touches the resolver; the range check fires
        let err = validator()
            .validate_str("http://10.1.2.3/internal")
            .await
            .unwrap_err();
        assert!(matches!(err, SecurityError::PrivateAddress { .. }));
    }

    #[test]
    fn test_public_dns_resolver_address_accepted() {
        let url = Url::parse("https://dns.example.com/").unwrap();
        assert!(validator().validate_resolved(&url, addr("8.8.8.8")).is_ok());
    }

    #[test]
    fn test_ipv6_documentation_rejected() {
        let url = Url::parse("http://example.com/").unwrap();
        let err = validator()
            .validate_resolved(&url, addr("2001:db8::1"))
            .unwrap_err();
        assert!(matches!(
            err,
            SecurityError::PrivateAddress { range: "documentation", .. }
        ));
    }
}
