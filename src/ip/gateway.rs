//! Subnet and gateway resolution.
//!
//! Parses overlay CIDR strings into networks and derives the conventional
//! gateway address: the network base with the low-order bit of its last
//! byte set.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::IpamError;

/// Parse a CIDR string and compute its gateway
///
/// Host bits in the input are discarded, so `10.0.0.5/24` resolves to the
/// network `10.0.0.0/24` with gateway `10.0.0.1`.
///
/// # Examples
/// ```
/// use overlay_ipam::ip::resolve_gateway;
///
/// let (gateway, network) = resolve_gateway("127.168.128.0/18").unwrap();
/// assert_eq!(gateway.to_string(), "127.168.128.1");
/// assert_eq!(network.to_string(), "127.168.128.0/18");
/// assert!(resolve_gateway("127.168.128.0/32").is_err());
/// ```
pub fn resolve_gateway(cidr: &str) -> Result<(IpAddr, IpNet), IpamError> {
    let network = cidr
        .trim()
        .parse::<IpNet>()
        .map_err(|e| IpamError::invalid_cidr(cidr, e.to_string()))?;
    let network = network.trunc();

    if network.max_prefix_len() == network.prefix_len() {
        return Err(IpamError::invalid_cidr(cidr, "does not represent a network (no host bits)"));
    }

    let gateway = match network {
        IpNet::V4(net) => IpAddr::V4(gateway_of_v4(&net)),
        IpNet::V6(net) => IpAddr::V6(gateway_of_v6(&net)),
    };

    log::debug!("Resolved gateway {} for network {}", gateway, network);
    Ok((gateway, network))
}

/// Resolve an IPv4 CIDR, rejecting IPv6 input
pub fn resolve_gateway_v4(cidr: &str) -> Result<(Ipv4Addr, Ipv4Net), IpamError> {
    match resolve_gateway(cidr)? {
        (IpAddr::V4(gateway), IpNet::V4(network)) => Ok((gateway, network)),
        _ => Err(IpamError::invalid_cidr(cidr, "expected an IPv4 network")),
    }
}

/// Resolve an IPv6 CIDR, rejecting IPv4 input
pub fn resolve_gateway_v6(cidr: &str) -> Result<(Ipv6Addr, Ipv6Net), IpamError> {
    match resolve_gateway(cidr)? {
        (IpAddr::V6(gateway), IpNet::V6(network)) => Ok((gateway, network)),
        _ => Err(IpamError::invalid_cidr(cidr, "expected an IPv6 network")),
    }
}

fn gateway_of_v4(network: &Ipv4Net) -> Ipv4Addr {
    let mut octets = network.network().octets();
    octets[3] |= 1;
    Ipv4Addr::from(octets)
}

fn gateway_of_v6(network: &Ipv6Net) -> Ipv6Addr {
    let mut octets = network.network().octets();
    octets[15] |= 1;
    Ipv6Addr::from(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_gateway(valid_cidr: &str, expected_gateway: &str, invalid_cidr: &str) {
        let (gateway, network) = resolve_gateway(valid_cidr).unwrap();
        assert_eq!(
            gateway,
            expected_gateway.parse::<IpAddr>().unwrap(),
            "Default gateway of {} must be {} (in {})",
            valid_cidr,
            expected_gateway,
            network
        );

        let result = resolve_gateway(invalid_cidr);
        assert!(
            matches!(result, Err(IpamError::InvalidCidr { .. })),
            "There should not be a default gateway for {}, got {:?}",
            invalid_cidr,
            result
        );
    }

    #[test]
    fn test_gateway_v4() {
        check_gateway("127.168.128.0/18", "127.168.128.1", "127.168.128.0/32");
    }

    #[test]
    fn test_gateway_v6() {
        check_gateway("fe80:1234:1234:1234::/64", "fe80:1234:1234:1234::1", "fe80:1234:1234:1234::/128");
    }

    #[test]
    fn test_host_bits_are_truncated() {
        let (gateway, network) = resolve_gateway("10.99.97.77/24").unwrap();
        assert_eq!(network.to_string(), "10.99.97.0/24");
        assert_eq!(gateway.to_string(), "10.99.97.1");
    }

    #[test]
    fn test_smallest_networks() {
        let (gateway, _) = resolve_gateway("10.0.0.0/31").unwrap();
        assert_eq!(gateway.to_string(), "10.0.0.1");

        let (gateway, _) = resolve_gateway("fd00::/127").unwrap();
        assert_eq!(gateway.to_string(), "fd00::1");
    }

    #[test]
    fn test_parse_result_is_network() {
        let (_, network) = resolve_gateway(" 10.99.97.0/24 ").unwrap();
        assert!(matches!(network, IpNet::V4(net) if net.prefix_len() == 24));
    }

    #[test]
    fn test_malformed_cidr() {
        for cidr in ["", "10.0.0.0", "10.0.0.0/33", "not-a-network/8", "fd00::/129"] {
            assert!(
                matches!(resolve_gateway(cidr), Err(IpamError::InvalidCidr { .. })),
                "{} should be rejected",
                cidr
            );
        }
    }

    #[test]
    fn test_family_specific_resolution() {
        let (gateway, network) = resolve_gateway_v4("10.99.97.0/24").unwrap();
        assert_eq!(gateway, Ipv4Addr::new(10, 99, 97, 1));
        assert_eq!(network.prefix_len(), 24);

        let (gateway, _) = resolve_gateway_v6("fd00::10:97:0/112").unwrap();
        assert_eq!(gateway, "fd00::10:97:1".parse::<Ipv6Addr>().unwrap());

        assert!(resolve_gateway_v4("fd00::/64").is_err());
        assert!(resolve_gateway_v6("10.0.0.0/8").is_err());
    }
}
