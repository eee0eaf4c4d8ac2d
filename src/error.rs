//! Error types shared by the address-assignment core.

/// Errors that can occur while resolving subnets or assigning peer addresses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpamError {
    /// The CIDR string does not parse, belongs to the wrong address family,
    /// or leaves no host bits for a gateway and peers.
    #[error("Invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// The address derived from this peer id falls outside the configured
    /// subnet or outside the usable address class.
    #[error("No addresses available for peer id {id}: address pool exhausted")]
    AddressPoolExhausted { id: u32 },
}

impl IpamError {
    pub(crate) fn invalid_cidr(cidr: &str, reason: impl Into<String>) -> Self {
        IpamError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can continue running after this error.
    ///
    /// Subnet errors surface at startup and must abort; pool exhaustion only
    /// refuses the single peer being created.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IpamError::AddressPoolExhausted { .. })
    }
}
