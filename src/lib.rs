//! # Overlay IPAM - Deterministic address assignment for overlay network peers
//!
//! This library assigns IPv4 and IPv6 addresses to the peers of a private
//! overlay network. Every address is a pure function of a small integer peer
//! id and the configured overlay pools, so addresses never need to be stored
//! alongside the peer.
//!
//! ## Overview
//!
//! - **Gateway resolution**: parse a pool CIDR and derive its gateway (`a.b.c.0/24` -> `a.b.c.1`)
//! - **Address allocation**: map a peer id onto one address in each pool
//! - **Free id lookup**: choose the smallest unused peer id, reusing gaps left by deleted peers
//! - **Network configuration**: both resolved pools, built once and passed explicitly
//!
//! ## Architecture
//!
//! - `ip`: gateway resolution, address allocation and free id lookup
//! - `network_config`: the immutable process-wide pool configuration
//! - `config`: YAML configuration structures and validation
//! - `config_loader`: configuration file loading
//! - `error`: error types of the address-assignment core
//! - `utils`: IP classification and formatting helpers
//!
//! ## Example Usage
//!
//! ```rust
//! use overlay_ipam::NetworkConfig;
//!
//! let network = NetworkConfig::new("10.99.97.0/24", "fd00::10:97:0/112")?;
//!
//! // Existing peers hold ids 2, 3 and 5; the next peer reuses the gap.
//! let plan = network.plan_next_peer(&[2, 3, 5])?;
//! assert_eq!(plan.id, 4);
//! assert_eq!(plan.address.ipv4.to_string(), "10.99.97.4");
//! assert_eq!(plan.address.ipv6.to_string(), "fd00::10:97:4");
//! # Ok::<(), overlay_ipam::IpamError>(())
//! ```
//!
//! ## Concurrency
//!
//! All operations are synchronous and side-effect free, and [`NetworkConfig`]
//! is read-only, so it can be shared between threads without locking. The
//! sequence "read existing peers, choose id, allocate, persist" is not atomic:
//! callers must serialize it themselves.
//!
//! ## Error Handling
//!
//! Library functions return [`IpamError`]. An invalid pool CIDR is fatal at
//! startup; an exhausted pool only refuses the peer being created. The binary
//! wraps errors with `color_eyre` for reporting.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod network_config;
pub mod utils;

pub use error::IpamError;
pub use network_config::{AddressFamilies, NetworkConfig, PeerAddress, PeerAssignment};
