//! Carrier distribution policies
//!
//! A policy decides on which of the configured carriers a new logical
//! channel is mapped. The CCM validates whatever the policy returns, so a
//! policy only expresses preference.

use ltesim_common::{CcmAlgorithm, ComponentCarrierId, LogicalChannelId};
use ltesim_sap::{CarrierIdSet, LogicalChannelConfig};

/// Distribution policy used by the UE component carrier manager.
pub trait CarrierDistributionPolicy {
    /// Policy name, for logging.
    fn name(&self) -> &'static str;

    /// Returns the carriers for a new channel, highest priority first.
    ///
    /// An empty result means the channel cannot be placed.
    fn distribute(
        &self,
        lc_id: LogicalChannelId,
        lc_config: &LogicalChannelConfig,
        configured: &CarrierIdSet,
    ) -> Vec<ComponentCarrierId>;
}

/// Maps every channel on the primary carrier only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryCarrierOnly;

impl CarrierDistributionPolicy for PrimaryCarrierOnly {
    fn name(&self) -> &'static str {
        "PrimaryCarrierOnly"
    }

    fn distribute(
        &self,
        _lc_id: LogicalChannelId,
        _lc_config: &LogicalChannelConfig,
        configured: &CarrierIdSet,
    ) -> Vec<ComponentCarrierId> {
        if configured.contains(&ComponentCarrierId::PRIMARY) {
            vec![ComponentCarrierId::PRIMARY]
        } else {
            Vec::new()
        }
    }
}

/// Maps every channel on all configured carriers, primary first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitAcrossCarriers;

impl CarrierDistributionPolicy for SplitAcrossCarriers {
    fn name(&self) -> &'static str {
        "SplitAcrossCarriers"
    }

    fn distribute(
        &self,
        _lc_id: LogicalChannelId,
        _lc_config: &LogicalChannelConfig,
        configured: &CarrierIdSet,
    ) -> Vec<ComponentCarrierId> {
        // BTreeSet iterates ascending, so the primary (id 0) leads
        configured.iter().copied().collect()
    }
}

/// Builds the policy selected by a configured algorithm.
pub fn policy_for(algorithm: CcmAlgorithm) -> Box<dyn CarrierDistributionPolicy> {
    match algorithm {
        CcmAlgorithm::PrimaryCarrierOnly => Box::new(PrimaryCarrierOnly),
        CcmAlgorithm::SplitAcrossCarriers => Box::new(SplitAcrossCarriers),
    }
}
