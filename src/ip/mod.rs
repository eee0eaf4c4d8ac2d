//! IP address assignment module.
//!
//! This module resolves overlay subnets and their gateways, derives peer
//! addresses from peer ids, and picks the next free peer id.

pub mod allocator;
pub mod free_id;
pub mod gateway;

// Re-export commonly used items
pub use allocator::{allocate, allocate_with, decimal_as_hex, DecimalAsHex, Ipv6SuffixEncoding};
pub use free_id::{find_first_free_id, find_first_free_id_for, PeerRecord, MIN_PEER_ID};
pub use gateway::{resolve_gateway, resolve_gateway_v4, resolve_gateway_v6};
