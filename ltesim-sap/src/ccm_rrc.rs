//! CCM-RRC SAP
//!
//! Service access point between the UE RRC and the UE component carrier
//! manager (CCM).
//!
//! - [`CcmRrcSapProvider`]: CCM primitives invoked by the RRC
//! - [`CcmRrcSapUser`]: RRC primitives invoked by the CCM
//!
//! ```text
//!        ┌─────────┐
//!        │   RRC   │
//!        └──┬───▲──┘
//!  Provider │   │ User
//!  (AddLc,  │   │ (ComponentCarrierEnabling)
//!   ...)    ▼   │
//!        ┌──────┴──┐
//!        │   CCM   │
//!        └─────────┘
//! ```
//!
//! Both sides are reached through trait objects, usually the member adapters
//! from [`crate::member`], so neither layer depends on the other's concrete
//! type.

use std::collections::BTreeSet;

use ltesim_common::{ComponentCarrierId, LogicalChannelId};

use crate::error::SapError;
use crate::mac::{LogicalChannelConfig, MacSapUserHandle};

/// Carriers on which a logical channel was active.
pub type CarrierIdSet = BTreeSet<ComponentCarrierId>;

/// Binding of a logical channel onto one component carrier.
///
/// One binding is produced per carrier the channel is mapped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsConfig {
    /// Carrier the channel is mapped on
    pub component_carrier_id: ComponentCarrierId,
    /// MAC configuration for the channel on this carrier
    pub lc_config: LogicalChannelConfig,
    /// Data sink the carrier's MAC delivers to
    pub msu: MacSapUserHandle,
}

impl LcsConfig {
    /// Creates a carrier binding.
    pub fn new(
        component_carrier_id: ComponentCarrierId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Self {
        Self {
            component_carrier_id,
            lc_config,
            msu,
        }
    }
}

/// Collects the carrier IDs of a list of bindings.
pub fn carriers_of(bindings: &[LcsConfig]) -> CarrierIdSet {
    bindings.iter().map(|b| b.component_carrier_id).collect()
}

/// CCM primitives offered to the RRC.
pub trait CcmRrcSapProvider {
    /// Adds a logical channel and distributes it over one or more carriers.
    ///
    /// Returns one binding per selected carrier, primary carrier first when
    /// it is selected. Never returns an empty list: a channel that cannot be
    /// placed fails with [`SapError::NoCarrierAvailable`].
    fn add_lc(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, SapError>;

    /// Removes a logical channel and returns the carriers that served it.
    fn remove_lc(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, SapError>;

    /// Signals that an RRC connection reconfiguration exchange completed.
    fn notify_connection_reconfiguration(&self);

    /// Configures the signaling bearer.
    ///
    /// Returns the sink the CCM uses for signaling traffic, which may be the
    /// CCM's own interposing sink rather than `msu`.
    fn configure_signal_bearer(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, SapError>;
}

/// RRC primitives offered to the CCM.
pub trait CcmRrcSapUser {
    /// Tells the RRC which secondary carriers should be enabled.
    ///
    /// An empty list means there is nothing to enable. Must not block.
    fn component_carrier_enabling(&self, component_carrier_list: Vec<ComponentCarrierId>);
}
