//! Peer address allocation logic.
//!
//! Maps a peer id onto one IPv4 and one IPv6 address inside the overlay
//! subnets. The id is consumed in 8-bit chunks, least significant first;
//! each chunk is added into successive low-order bytes of the network
//! base addresses. On the IPv6 side each chunk is first re-encoded so
//! the address suffix reads as the decimal id (id 100 becomes `::100`).

use ipnet::{Ipv4Net, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::IpamError;
use crate::utils::ip_utils::is_assignable_ipv6;

/// How an 8-bit id chunk is written into two bytes of the IPv6 suffix
pub trait Ipv6SuffixEncoding {
    fn encode(&self, chunk: u8) -> u16;
}

/// Writes the decimal digits of each chunk as literal hex digits
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalAsHex;

impl Ipv6SuffixEncoding for DecimalAsHex {
    fn encode(&self, chunk: u8) -> u16 {
        decimal_as_hex(chunk)
    }
}

/// Re-encode a byte so its decimal digits become hex digits (`255` -> `0x255`)
///
/// # Examples
/// ```
/// use overlay_ipam::ip::decimal_as_hex;
///
/// assert_eq!(decimal_as_hex(100), 0x100);
/// assert_eq!(decimal_as_hex(42), 0x42);
/// assert_eq!(decimal_as_hex(255), 0x255);
/// ```
pub fn decimal_as_hex(decimal: u8) -> u16 {
    let decimal = u16::from(decimal);
    (decimal % 10) + 16 * ((decimal / 10) % 10) + 256 * (decimal / 100)
}

/// Generate the IPv4 and IPv6 addresses of a peer
///
/// Fails with [`IpamError::AddressPoolExhausted`] when the IPv4 result leaves
/// its subnet or hits the broadcast address, or when the IPv6 result leaves its
/// subnet or is neither global nor link-local unicast.
///
/// # Examples
/// ```
/// use overlay_ipam::ip::allocate;
///
/// let v4 = "127.10.0.0/16".parse().unwrap();
/// let v6 = "fe80::/112".parse().unwrap();
/// let (ipv4, ipv6) = allocate(&v4, &v6, 100).unwrap();
/// assert_eq!(ipv4.to_string(), "127.10.0.100");
/// assert_eq!(ipv6.to_string(), "fe80::100");
/// ```
pub fn allocate(v4_net: &Ipv4Net, v6_net: &Ipv6Net, id: u32) -> Result<(Ipv4Addr, Ipv6Addr), IpamError> {
    allocate_with(&DecimalAsHex, v4_net, v6_net, id)
}

/// Same as [`allocate`] with a custom IPv6 suffix encoding
pub fn allocate_with<E: Ipv6SuffixEncoding>(
    encoding: &E,
    v4_net: &Ipv4Net,
    v6_net: &Ipv6Net,
    id: u32,
) -> Result<(Ipv4Addr, Ipv6Addr), IpamError> {
    let mut v4 = v4_net.network().octets();
    let mut v6 = v6_net.network().octets();

    // Bytes wrap individually; there is no carry into the next byte.
    for (k, chunk) in id_chunks(id).enumerate() {
        let pos4 = v4.len() - 1 - k;
        v4[pos4] = v4[pos4].wrapping_add(chunk);

        let [high, low] = encoding.encode(chunk).to_be_bytes();
        let pos6 = v6.len() - 2 - 2 * k;
        v6[pos6] = v6[pos6].wrapping_add(high);
        v6[pos6 + 1] = v6[pos6 + 1].wrapping_add(low);
    }

    let ipv4 = Ipv4Addr::from(v4);
    if !v4_net.contains(&ipv4) || ipv4 == v4_net.broadcast() {
        log::warn!("IPv4 pool {} exhausted for peer id {} (derived {})", v4_net, id, ipv4);
        return Err(IpamError::AddressPoolExhausted { id });
    }

    let ipv6 = Ipv6Addr::from(v6);
    if !v6_net.contains(&ipv6) || !is_assignable_ipv6(&ipv6) {
        log::warn!("IPv6 pool {} exhausted for peer id {} (derived {})", v6_net, id, ipv6);
        return Err(IpamError::AddressPoolExhausted { id });
    }

    log::debug!("Generated addresses {} and {} for peer id {}", ipv4, ipv6, id);
    Ok((ipv4, ipv6))
}

/// Split an id into base-256 digits, least significant first, stopping once no bits remain
fn id_chunks(id: u32) -> impl Iterator<Item = u8> {
    std::iter::successors(Some(id), |left| Some(left >> 8))
        .take_while(|left| *left != 0)
        .map(|left| (left & 0xff) as u8)
}
