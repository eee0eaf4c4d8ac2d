//! Overlay network configuration.
//!
//! A [`NetworkConfig`] is built once at startup from the IPv4 and IPv6 pool
//! CIDRs and then shared read-only with every call site that assigns peer
//! addresses. Changing the pools requires building a new configuration.

use ipnet::{Ipv4Net, Ipv6Net};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::IpamError;
use crate::ip::{self, resolve_gateway_v4, resolve_gateway_v6};
use crate::utils::ip_utils::format_host_route;

/// Resolved IPv4 and IPv6 overlay networks with their gateways
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    gateway_v4: Ipv4Addr,
    gateway_v6: Ipv6Addr,
    network_v4: Ipv4Net,
    network_v6: Ipv6Net,
}

/// Addresses generated for a single peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PeerAddress {
    pub ipv4: Ipv4Addr,
    pub ipv6: Ipv6Addr,
}

/// A free peer id together with the addresses it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeerAssignment {
    pub id: u32,
    #[serde(flatten)]
    pub address: PeerAddress,
}

/// Address families routed through the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFamilies {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl Default for AddressFamilies {
    fn default() -> Self {
        Self { ipv4: true, ipv6: true }
    }
}

impl NetworkConfig {
    /// Resolve both pools; any invalid CIDR fails the whole configuration
    pub fn new(v4_cidr: &str, v6_cidr: &str) -> Result<Self, IpamError> {
        let (gateway_v4, network_v4) = resolve_gateway_v4(v4_cidr)?;
        let (gateway_v6, network_v6) = resolve_gateway_v6(v6_cidr)?;

        log::info!(
            "Overlay networks initialized: {} (gateway {}), {} (gateway {})",
            network_v4,
            gateway_v4,
            network_v6,
            gateway_v6
        );

        Ok(Self {
            gateway_v4,
            gateway_v6,
            network_v4,
            network_v6,
        })
    }

    pub fn gateway_v4(&self) -> Ipv4Addr {
        self.gateway_v4
    }

    pub fn gateway_v6(&self) -> Ipv6Addr {
        self.gateway_v6
    }

    pub fn network_v4(&self) -> &Ipv4Net {
        &self.network_v4
    }

    pub fn network_v6(&self) -> &Ipv6Net {
        &self.network_v6
    }

    /// Generate the addresses of the peer with the given id
    pub fn allocate(&self, id: u32) -> Result<PeerAddress, IpamError> {
        let (ipv4, ipv6) = ip::allocate(&self.network_v4, &self.network_v6, id)?;
        Ok(PeerAddress { ipv4, ipv6 })
    }

    /// Pick the next free id and check that it still maps into both pools
    ///
    /// Nothing is reserved: the caller must serialize this call together with
    /// persisting the new peer.
    pub fn plan_next_peer(&self, assigned: &[u32]) -> Result<PeerAssignment, IpamError> {
        let id = ip::find_first_free_id(assigned);
        let address = self.allocate(id)?;
        Ok(PeerAssignment { id, address })
    }
}

impl PeerAddress {
    /// Render the peer's host routes, e.g. `10.99.97.2/32,fd00::10:97:2/128`
    pub fn allowed_ips(&self, families: AddressFamilies) -> String {
        let mut routes = Vec::with_capacity(2);
        if families.ipv4 {
            routes.push(format_host_route(IpAddr::V4(self.ipv4)));
        }
        if families.ipv6 {
            routes.push(format_host_route(IpAddr::V6(self.ipv6)));
        }
        routes.join(",")
    }
}
