//! Consensus configuration snapshots.
//!
//! Network identity and the milestone schedule are owned by the node's
//! configuration subsystem; these are the read-only views other
//! subsystems consume.

use serde::{Deserialize, Serialize};

/// Network identity parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human readable network name.
    pub name: String,
    /// Network identifier byte; doubles as the address version byte.
    pub pub_key_hash: u8,
    /// WIF prefix byte for private key export.
    pub wif: u8,
}

impl NetworkConfig {
    /// The mainnet configuration.
    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            pub_key_hash: 0x17,
            wif: 0xaa,
        }
    }

    /// A development network configuration for tests.
    pub fn devnet() -> Self {
        Self {
            name: "devnet".to_string(),
            pub_key_hash: 0x1e,
            wif: 0xaa,
        }
    }
}

/// A configuration epoch keyed by block height.
///
/// Milestones change consensus parameters at fixed heights; a lookup at
/// height `h` returns the last milestone with `height <= h`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Height this milestone activates at.
    pub height: u64,
    /// Seconds between blocks.
    pub block_time: u32,
    /// Protocol version expected from this height on.
    pub version: u8,
}

impl Milestone {
    /// The genesis milestone with an 8 second block time.
    pub fn genesis() -> Self {
        Self {
            height: 1,
            block_time: 8,
            version: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_network_byte() {
        assert_eq!(NetworkConfig::mainnet().pub_key_hash, 0x17);
    }

    #[test]
    fn test_genesis_milestone() {
        let milestone = Milestone::genesis();
        assert_eq!(milestone.height, 1);
        assert_eq!(milestone.block_time, 8);
    }
}
