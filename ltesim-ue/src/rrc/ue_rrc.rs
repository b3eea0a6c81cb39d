//! UE RRC carrier aggregation handling
//!
//! The RRC side of the CCM-RRC SAP: bearer setup and release through the
//! CCM, per-carrier MAC bookkeeping, and secondary carrier enabling.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use ltesim_common::{log_sap_primitive, ComponentCarrierId, Direction, LogicalChannelId};
use ltesim_sap::{
    CarrierIdSet, CcmRrcSapProvider, CcmRrcSapUser, CcmRrcSapUserOwner, LcsConfig,
    LogicalChannelConfig, MacSapUserHandle, MemberCcmRrcSapUser, SapError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::carrier::CarrierMacState;

const SAP: &str = "CCM-RRC";

/// Errors raised by the RRC while driving the CCM.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RrcError {
    /// No CCM-RRC SAP provider has been attached
    #[error("no CCM-RRC SAP provider attached")]
    NoCcmProvider,

    /// The CCM reported a failure
    #[error("CCM-RRC SAP failure: {0}")]
    Sap(#[from] SapError),

    /// The CCM bound a channel on a carrier the RRC has not configured
    #[error("component carrier {0} is not configured at RRC")]
    InvalidCarrierReference(ComponentCarrierId),
}

/// Signaling bearer established through the CCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingBearer {
    /// LCID of the signaling bearer
    pub lc_id: LogicalChannelId,
    /// Sink the CCM receives signaling traffic on
    pub ccm_sink: MacSapUserHandle,
}

/// UE RRC, carrier aggregation part.
pub struct UeRrc {
    ccm_rrc_sap_provider: RefCell<Option<Rc<dyn CcmRrcSapProvider>>>,
    mac_state: RefCell<CarrierMacState>,
    signaling_bearer: RefCell<Option<SignalingBearer>>,
    /// Enabling requests from the CCM not yet acted on
    pending_enabling: RefCell<VecDeque<Vec<ComponentCarrierId>>>,
    active_carriers: RefCell<CarrierIdSet>,
    reconfiguration_count: Cell<u32>,
}

impl UeRrc {
    /// Creates an RRC for the given configured carriers.
    ///
    /// The primary carrier, if configured, starts active.
    pub fn new(configured: CarrierIdSet) -> Rc<Self> {
        let active: CarrierIdSet = configured
            .iter()
            .copied()
            .filter(ComponentCarrierId::is_primary)
            .collect();

        Rc::new(Self {
            ccm_rrc_sap_provider: RefCell::new(None),
            mac_state: RefCell::new(CarrierMacState::new(&configured)),
            signaling_bearer: RefCell::new(None),
            pending_enabling: RefCell::new(VecDeque::new()),
            active_carriers: RefCell::new(active),
            reconfiguration_count: Cell::new(0),
        })
    }

    /// Returns a user SAP forwarding to this RRC.
    pub fn ccm_rrc_sap_user(self: &Rc<Self>) -> Rc<dyn CcmRrcSapUser> {
        Rc::new(MemberCcmRrcSapUser::new(self))
    }

    /// Attaches, or replaces, the CCM the RRC talks to.
    pub fn set_ccm_rrc_sap_provider(&self, provider: Rc<dyn CcmRrcSapProvider>) {
        *self.ccm_rrc_sap_provider.borrow_mut() = Some(provider);
    }

    fn provider(&self) -> Result<Rc<dyn CcmRrcSapProvider>, RrcError> {
        self.ccm_rrc_sap_provider
            .borrow()
            .clone()
            .ok_or(RrcError::NoCcmProvider)
    }

    /// Establishes the signaling bearer with its fixed configuration.
    ///
    /// Returns the sink the CCM interposed for signaling traffic.
    pub fn setup_signaling_bearer(
        &self,
        lc_id: LogicalChannelId,
        rlc_sink: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, RrcError> {
        let provider = self.provider()?;
        let lc_config = LogicalChannelConfig::signaling();

        log_sap_primitive(SAP, Direction::Down, "ConfigureSignalBearer", &format!("lcid={lc_id}"));
        let ccm_sink = provider.configure_signal_bearer(lc_id, lc_config, rlc_sink)?;

        let binding = LcsConfig::new(ComponentCarrierId::PRIMARY, lc_config, ccm_sink.clone());
        if !self.mac_state.borrow_mut().apply(lc_id, binding) {
            provider.remove_lc(lc_id)?;
            return Err(RrcError::InvalidCarrierReference(ComponentCarrierId::PRIMARY));
        }

        *self.signaling_bearer.borrow_mut() = Some(SignalingBearer {
            lc_id,
            ccm_sink: ccm_sink.clone(),
        });
        info!(lcid = %lc_id, "Signaling bearer established");
        Ok(ccm_sink)
    }

    /// Adds a data bearer and installs its bindings on each carrier's MAC.
    ///
    /// If the CCM binds the channel on a carrier unknown to the RRC, the
    /// channel is removed from the CCM again and the call fails.
    pub fn add_data_bearer(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        rlc_sink: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, RrcError> {
        let provider = self.provider()?;

        log_sap_primitive(SAP, Direction::Down, "AddLc", &format!("lcid={lc_id}"));
        let bindings = provider.add_lc(lc_id, lc_config, rlc_sink)?;

        let unknown = {
            let mac_state = self.mac_state.borrow();
            bindings
                .iter()
                .map(|b| b.component_carrier_id)
                .find(|&cc| !mac_state.is_configured(cc))
        };
        if let Some(cc) = unknown {
            warn!(lcid = %lc_id, cc = %cc, "CCM bound channel on unconfigured carrier, rolling back");
            provider.remove_lc(lc_id)?;
            return Err(RrcError::InvalidCarrierReference(cc));
        }

        let mut mac_state = self.mac_state.borrow_mut();
        for binding in &bindings {
            mac_state.apply(lc_id, binding.clone());
        }
        info!(lcid = %lc_id, carriers = bindings.len(), "Data bearer established");
        Ok(bindings)
    }

    /// Releases a bearer and clears it from every carrier's MAC.
    pub fn release_bearer(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, RrcError> {
        let provider = self.provider()?;

        log_sap_primitive(SAP, Direction::Down, "RemoveLc", &format!("lcid={lc_id}"));
        let carriers = provider.remove_lc(lc_id)?;

        let released = self.mac_state.borrow_mut().release(lc_id, &carriers);
        {
            let mut signaling = self.signaling_bearer.borrow_mut();
            if signaling.as_ref().is_some_and(|srb| srb.lc_id == lc_id) {
                *signaling = None;
            }
        }

        info!(lcid = %lc_id, carriers = ?carriers, released, "Bearer released");
        Ok(carriers)
    }

    /// Adds secondary carriers configured by a reconfiguration message.
    pub fn configure_secondary_carriers(&self, carriers: &[ComponentCarrierId]) {
        let mut mac_state = self.mac_state.borrow_mut();
        for &cc in carriers {
            mac_state.configure_carrier(cc);
        }
    }

    /// Reports a completed RRC connection reconfiguration to the CCM.
    pub fn complete_reconfiguration(&self) -> Result<(), RrcError> {
        let provider = self.provider()?;
        self.reconfiguration_count
            .set(self.reconfiguration_count.get() + 1);

        log_sap_primitive(SAP, Direction::Down, "NotifyConnectionReconfigurationMsg", "");
        provider.notify_connection_reconfiguration();
        Ok(())
    }

    /// Acts on queued carrier enabling requests.
    ///
    /// Returns the carriers that became active.
    pub fn process_pending_carrier_enabling(&self) -> CarrierIdSet {
        let requests: Vec<Vec<ComponentCarrierId>> =
            self.pending_enabling.borrow_mut().drain(..).collect();

        let mac_state = self.mac_state.borrow();
        let mut active = self.active_carriers.borrow_mut();
        let mut activated = CarrierIdSet::new();
        for cc in requests.into_iter().flatten() {
            // The carrier may have been deconfigured since the request
            if mac_state.is_configured(cc) && active.insert(cc) {
                activated.insert(cc);
            }
        }

        if !activated.is_empty() {
            info!(carriers = ?activated, "Secondary carriers activated");
        }
        activated
    }

    /// Carriers currently active.
    pub fn active_carriers(&self) -> CarrierIdSet {
        self.active_carriers.borrow().clone()
    }

    /// Carriers currently configured.
    pub fn configured_carriers(&self) -> CarrierIdSet {
        self.mac_state.borrow().carriers()
    }

    /// Number of enabling requests waiting to be processed.
    pub fn pending_carrier_enabling(&self) -> usize {
        self.pending_enabling.borrow().len()
    }

    /// Channels installed on a carrier's MAC.
    pub fn channels_on(&self, cc: ComponentCarrierId) -> Vec<LogicalChannelId> {
        self.mac_state.borrow().channels_on(cc)
    }

    /// Binding of a channel on a carrier's MAC.
    pub fn binding(&self, cc: ComponentCarrierId, lc_id: LogicalChannelId) -> Option<LcsConfig> {
        self.mac_state.borrow().binding(cc, lc_id).cloned()
    }

    /// The signaling bearer, if established.
    pub fn signaling_bearer(&self) -> Option<SignalingBearer> {
        self.signaling_bearer.borrow().clone()
    }

    /// Number of reconfigurations reported to the CCM.
    pub fn reconfiguration_count(&self) -> u32 {
        self.reconfiguration_count.get()
    }
}

impl CcmRrcSapUserOwner for UeRrc {
    fn do_component_carrier_enabling(&self, component_carrier_list: Vec<ComponentCarrierId>) {
        log_sap_primitive(
            SAP,
            Direction::Up,
            "ComponentCarrierEnabling",
            &format!("carriers={component_carrier_list:?}"),
        );

        if component_carrier_list.is_empty() {
            debug!("No secondary carrier to enable");
            return;
        }

        let known: Vec<ComponentCarrierId> = {
            let mac_state = self.mac_state.borrow();
            component_carrier_list
                .into_iter()
                .filter(|&cc| {
                    let configured = mac_state.is_configured(cc);
                    if !configured {
                        warn!(cc = %cc, "Enabling requested for unconfigured carrier, ignored");
                    }
                    configured
                })
                .collect()
        };

        if !known.is_empty() {
            self.pending_enabling.borrow_mut().push_back(known);
        }
    }
}

impl fmt::Debug for UeRrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UeRrc")
            .field("configured", &self.configured_carriers())
            .field("active", &*self.active_carriers.borrow())
            .field("pending_enabling", &self.pending_carrier_enabling())
            .field("signaling_bearer", &*self.signaling_bearer.borrow())
            .finish()
    }
}
