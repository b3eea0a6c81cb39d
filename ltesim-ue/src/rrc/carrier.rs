//! Per-carrier MAC logical channel state
//!
//! RRC keeps, for every configured component carrier, the logical channels
//! it has installed on that carrier's MAC instance. Bindings returned by the
//! CCM are applied here and removed again when the channel is torn down.

use std::collections::BTreeMap;

use ltesim_common::{ComponentCarrierId, LogicalChannelId};
use ltesim_sap::{CarrierIdSet, LcsConfig};

/// Logical channels installed on each carrier's MAC.
#[derive(Debug, Default)]
pub struct CarrierMacState {
    carriers: BTreeMap<ComponentCarrierId, BTreeMap<LogicalChannelId, LcsConfig>>,
}

impl CarrierMacState {
    /// Creates empty MAC state for the given carriers.
    pub fn new(configured: &CarrierIdSet) -> Self {
        Self {
            carriers: configured.iter().map(|&cc| (cc, BTreeMap::new())).collect(),
        }
    }

    /// Adds a carrier; no-op if it is already configured.
    pub fn configure_carrier(&mut self, cc: ComponentCarrierId) {
        self.carriers.entry(cc).or_default();
    }

    /// Returns true if the carrier is configured.
    pub fn is_configured(&self, cc: ComponentCarrierId) -> bool {
        self.carriers.contains_key(&cc)
    }

    /// All configured carriers.
    pub fn carriers(&self) -> CarrierIdSet {
        self.carriers.keys().copied().collect()
    }

    /// Installs a binding on its carrier's MAC.
    ///
    /// Returns false if the binding's carrier is not configured.
    pub fn apply(&mut self, lc_id: LogicalChannelId, binding: LcsConfig) -> bool {
        match self.carriers.get_mut(&binding.component_carrier_id) {
            Some(channels) => {
                channels.insert(lc_id, binding);
                true
            }
            None => false,
        }
    }

    /// Removes a channel from the given carriers, returning how many MAC
    /// instances actually held it.
    pub fn release(&mut self, lc_id: LogicalChannelId, carriers: &CarrierIdSet) -> usize {
        let mut released = 0;
        for cc in carriers {
            if let Some(channels) = self.carriers.get_mut(cc) {
                if channels.remove(&lc_id).is_some() {
                    released += 1;
                }
            }
        }
        released
    }

    /// Channels installed on a carrier, ascending.
    pub fn channels_on(&self, cc: ComponentCarrierId) -> Vec<LogicalChannelId> {
        self.carriers
            .get(&cc)
            .map(|channels| channels.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Binding of a channel on a carrier.
    pub fn binding(&self, cc: ComponentCarrierId, lc_id: LogicalChannelId) -> Option<&LcsConfig> {
        self.carriers.get(&cc)?.get(&lc_id)
    }
}
