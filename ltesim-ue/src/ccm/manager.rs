//! UE Component Carrier Manager
//!
//! Owns the logical channel routing table and serves the CCM side of the
//! CCM-RRC SAP. Channels are spread over carriers by a swappable
//! [`CarrierDistributionPolicy`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use ltesim_common::{
    log_sap_primitive, ComponentCarrierId, Direction, LogicalChannelId, UeCcmConfig,
};
use ltesim_sap::{
    CarrierIdSet, CcmRrcSapProvider, CcmRrcSapProviderOwner, CcmRrcSapUser, LcsConfig,
    LogicalChannelConfig, MacSapUserHandle, MemberCcmRrcSapProvider, SapError,
};
use tracing::{debug, info, warn};

use super::mac_forwarder::CcmMacSapUser;
use super::policy::{policy_for, CarrierDistributionPolicy};

const SAP: &str = "CCM-RRC";

/// Kind of logical channel held in the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcKind {
    /// Signaling (control-plane) bearer
    Signaling,
    /// Data bearer
    Data,
}

impl fmt::Display for LcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcKind::Signaling => write!(f, "SRB"),
            LcKind::Data => write!(f, "DRB"),
        }
    }
}

/// Routing table entry of one logical channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcRoute {
    /// Signaling or data
    pub kind: LcKind,
    /// Configuration the channel was admitted with
    pub lc_config: LogicalChannelConfig,
    /// Sink of the RLC entity that originated the channel
    pub rlc_sink: MacSapUserHandle,
    /// Carriers serving the channel
    pub carriers: CarrierIdSet,
}

/// UE component carrier manager.
pub struct UeComponentCarrierManager {
    /// Carriers currently configured for the UE
    configured: RefCell<CarrierIdSet>,
    /// Secondary carriers already reported to RRC for enabling
    enabled_secondaries: RefCell<CarrierIdSet>,
    /// LCID -> route; only mutated by the SAP primitives
    routes: RefCell<BTreeMap<LogicalChannelId, LcRoute>>,
    policy: RefCell<Box<dyn CarrierDistributionPolicy>>,
    ccm_rrc_sap_user: RefCell<Option<Rc<dyn CcmRrcSapUser>>>,
    /// Sink the CCM interposes for the signaling bearer
    mac_sap_user: Rc<CcmMacSapUser>,
}

impl UeComponentCarrierManager {
    /// Creates a CCM for the given carriers and policy.
    pub fn new(configured: CarrierIdSet, policy: Box<dyn CarrierDistributionPolicy>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            configured: RefCell::new(configured),
            enabled_secondaries: RefCell::new(CarrierIdSet::new()),
            routes: RefCell::new(BTreeMap::new()),
            policy: RefCell::new(policy),
            ccm_rrc_sap_user: RefCell::new(None),
            mac_sap_user: Rc::new(CcmMacSapUser::new(weak.clone())),
        })
    }

    /// Creates a CCM from a UE carrier configuration.
    pub fn from_config(config: &UeCcmConfig) -> Rc<Self> {
        Self::new(config.carrier_ids(), policy_for(config.ccm_algorithm))
    }

    /// Returns a provider SAP forwarding to this CCM.
    pub fn ccm_rrc_sap_provider(self: &Rc<Self>) -> Rc<dyn CcmRrcSapProvider> {
        Rc::new(MemberCcmRrcSapProvider::new(self))
    }

    /// Attaches the RRC side of the SAP.
    pub fn set_ccm_rrc_sap_user(&self, user: Rc<dyn CcmRrcSapUser>) {
        *self.ccm_rrc_sap_user.borrow_mut() = Some(user);
    }

    /// Replaces the distribution policy; existing channels keep their carriers.
    pub fn set_policy(&self, policy: Box<dyn CarrierDistributionPolicy>) {
        info!(
            from = self.policy.borrow().name(),
            to = policy.name(),
            "CCM distribution policy changed"
        );
        *self.policy.borrow_mut() = policy;
    }

    /// Name of the active distribution policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.borrow().name()
    }

    /// Updates the configured carrier set.
    ///
    /// Carriers leaving the configuration are dropped from the enabled set.
    /// Existing routes are left untouched.
    pub fn set_configured_carriers(&self, carriers: CarrierIdSet) {
        self.enabled_secondaries
            .borrow_mut()
            .retain(|cc| carriers.contains(cc));
        debug!(count = carriers.len(), "CCM configured carriers updated");
        *self.configured.borrow_mut() = carriers;
    }

    /// Carriers currently configured.
    pub fn configured_carriers(&self) -> CarrierIdSet {
        self.configured.borrow().clone()
    }

    /// Secondary carriers already reported for enabling.
    pub fn enabled_secondary_carriers(&self) -> CarrierIdSet {
        self.enabled_secondaries.borrow().clone()
    }

    /// Routing table entry of a channel.
    pub fn route(&self, lc_id: LogicalChannelId) -> Option<LcRoute> {
        self.routes.borrow().get(&lc_id).cloned()
    }

    /// Channels currently in the routing table, ascending.
    pub fn routed_channels(&self) -> Vec<LogicalChannelId> {
        self.routes.borrow().keys().copied().collect()
    }

    /// Handle to the CCM's own MAC SAP user.
    pub fn mac_sap_user_handle(&self) -> MacSapUserHandle {
        MacSapUserHandle::new(&self.mac_sap_user)
    }

    pub(crate) fn rlc_sink(&self, lc_id: LogicalChannelId) -> Option<MacSapUserHandle> {
        self.routes.borrow().get(&lc_id).map(|r| r.rlc_sink.clone())
    }

    /// Checks a policy selection against the configured carriers.
    ///
    /// Duplicates collapse onto their first occurrence.
    fn validate_selection(
        &self,
        lc_id: LogicalChannelId,
        selected: Vec<ComponentCarrierId>,
    ) -> Result<Vec<ComponentCarrierId>, SapError> {
        if selected.is_empty() {
            return Err(SapError::NoCarrierAvailable(lc_id));
        }

        let configured = self.configured.borrow();
        let mut carriers = Vec::with_capacity(selected.len());
        for cc in selected {
            if !configured.contains(&cc) {
                return Err(SapError::InvalidCarrierReference(cc));
            }
            if !carriers.contains(&cc) {
                carriers.push(cc);
            }
        }
        Ok(carriers)
    }
}

impl CcmRrcSapProviderOwner for UeComponentCarrierManager {
    fn do_add_lc(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, SapError> {
        log_sap_primitive(SAP, Direction::Down, "AddLc", &format!("lcid={lc_id}"));

        if self.routes.borrow().contains_key(&lc_id) {
            return Err(SapError::ChannelAlreadyBound(lc_id));
        }

        let selected = {
            let configured = self.configured.borrow();
            self.policy.borrow().distribute(lc_id, &lc_config, &configured)
        };
        let carriers = self.validate_selection(lc_id, selected)?;

        let bindings: Vec<LcsConfig> = carriers
            .iter()
            .map(|&cc| LcsConfig::new(cc, lc_config, msu.clone()))
            .collect();

        self.routes.borrow_mut().insert(
            lc_id,
            LcRoute {
                kind: LcKind::Data,
                lc_config,
                rlc_sink: msu,
                carriers: carriers.iter().copied().collect(),
            },
        );

        debug!(
            lcid = %lc_id,
            policy = self.policy_name(),
            carriers = ?carriers,
            "Logical channel distributed"
        );
        Ok(bindings)
    }

    fn do_remove_lc(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, SapError> {
        log_sap_primitive(SAP, Direction::Down, "RemoveLc", &format!("lcid={lc_id}"));

        let removed = self.routes.borrow_mut().remove(&lc_id);
        let route = removed.ok_or(SapError::UnknownChannel(lc_id))?;

        debug!(lcid = %lc_id, kind = %route.kind, carriers = ?route.carriers, "Logical channel removed");
        Ok(route.carriers)
    }

    fn do_notify_connection_reconfiguration(&self) {
        log_sap_primitive(SAP, Direction::Down, "NotifyConnectionReconfigurationMsg", "");

        let Some(user) = self.ccm_rrc_sap_user.borrow().clone() else {
            warn!("Reconfiguration notified but no CCM-RRC SAP user attached");
            return;
        };

        let to_enable: Vec<ComponentCarrierId> = {
            let configured = self.configured.borrow();
            let mut enabled = self.enabled_secondaries.borrow_mut();
            let pending: Vec<ComponentCarrierId> = configured
                .iter()
                .copied()
                .filter(|cc| cc.is_secondary() && !enabled.contains(cc))
                .collect();
            enabled.extend(pending.iter().copied());
            pending
        };

        log_sap_primitive(
            SAP,
            Direction::Up,
            "ComponentCarrierEnabling",
            &format!("carriers={to_enable:?}"),
        );
        // No CCM borrow is held here; the RRC may call straight back in
        user.component_carrier_enabling(to_enable);
    }

    fn do_configure_signal_bearer(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, SapError> {
        log_sap_primitive(SAP, Direction::Down, "ConfigureSignalBearer", &format!("lcid={lc_id}"));

        if let Some(route) = self.routes.borrow().get(&lc_id) {
            return Err(match route.kind {
                LcKind::Signaling => SapError::DuplicateSignalingBearer(lc_id),
                LcKind::Data => SapError::ChannelAlreadyBound(lc_id),
            });
        }
        if !self.configured.borrow().contains(&ComponentCarrierId::PRIMARY) {
            return Err(SapError::NoCarrierAvailable(lc_id));
        }

        self.routes.borrow_mut().insert(
            lc_id,
            LcRoute {
                kind: LcKind::Signaling,
                lc_config,
                rlc_sink: msu,
                carriers: CarrierIdSet::from([ComponentCarrierId::PRIMARY]),
            },
        );

        info!(lcid = %lc_id, "Signaling bearer configured on primary carrier");
        Ok(self.mac_sap_user_handle())
    }
}

impl fmt::Debug for UeComponentCarrierManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UeComponentCarrierManager")
            .field("policy", &self.policy_name())
            .field("configured", &*self.configured.borrow())
            .field("enabled_secondaries", &*self.enabled_secondaries.borrow())
            .field("routes", &self.routes.borrow().len())
            .finish()
    }
}
