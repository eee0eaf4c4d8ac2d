use std::net::{IpAddr, Ipv6Addr};

/// IP utility functions for address classification and formatting

/// Check if an IPv6 address is link-local unicast (fe80::/10)
pub fn is_link_local_unicast(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xffc0 == 0xfe80
}

/// Check if an IPv6 address is global unicast
///
/// Uses the classic definition: any address that is not unspecified,
/// loopback, multicast or link-local unicast. Unique local addresses
/// (fc00::/7) therefore count as global unicast.
pub fn is_global_unicast(ip: &Ipv6Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback() && !ip.is_multicast() && !is_link_local_unicast(ip)
}

/// Check if an IPv6 address may be handed to a peer
pub fn is_assignable_ipv6(ip: &Ipv6Addr) -> bool {
    is_global_unicast(ip) || is_link_local_unicast(ip)
}

/// Format an IP address as a single-host route (`/32` for IPv4, `/128` for IPv6)
pub fn format_host_route(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(_) => format!("{}/32", ip),
        IpAddr::V6(_) => format!("{}/128", ip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_local_unicast() {
        assert!(is_link_local_unicast(&"fe80::1".parse().unwrap()));
        assert!(is_link_local_unicast(&"febf:ffff::1".parse().unwrap()));
        assert!(!is_link_local_unicast(&"fec0::1".parse().unwrap()));
        assert!(!is_link_local_unicast(&"fd00::1".parse().unwrap()));
    }

    #[test]
    fn test_global_unicast() {
        assert!(is_global_unicast(&"2001:db8::1".parse().unwrap()));
        assert!(is_global_unicast(&"fd00::10:97:2".parse().unwrap()));
        assert!(!is_global_unicast(&"::".parse().unwrap()));
        assert!(!is_global_unicast(&"::1".parse().unwrap()));
        assert!(!is_global_unicast(&"ff02::1".parse().unwrap()));
        assert!(!is_global_unicast(&"fe80::1".parse().unwrap()));
    }

    #[test]
    fn test_assignable_ipv6() {
        assert!(is_assignable_ipv6(&"fe80::100".parse().unwrap()));
        assert!(is_assignable_ipv6(&"fd00::1".parse().unwrap()));
        assert!(!is_assignable_ipv6(&"ff00::100".parse().unwrap()));
    }

    #[test]
    fn test_format_host_route() {
        assert_eq!(format_host_route("10.99.97.2".parse().unwrap()), "10.99.97.2/32");
        assert_eq!(format_host_route("fd00::10:97:2".parse().unwrap()), "fd00::10:97:2/128");
    }
}
