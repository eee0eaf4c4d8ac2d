//! Shared utilities: IP address classification and formatting helpers.

pub mod ip_utils;

pub use ip_utils::{format_host_route, is_assignable_ipv6, is_global_unicast, is_link_local_unicast};
