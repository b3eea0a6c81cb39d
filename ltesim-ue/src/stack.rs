//! UE carrier aggregation stack
//!
//! Builds the UE RRC and component carrier manager and connects them to
//! each other through the member adapters of the CCM-RRC SAP. Neither layer
//! refers to the other's concrete type.

use std::rc::Rc;

use ltesim_common::{CcmAlgorithm, ComponentCarrierId, Error, UeCcmConfig};
use ltesim_sap::CarrierIdSet;
use tracing::info;

use crate::ccm::{policy_for, UeComponentCarrierManager};
use crate::rrc::{RrcError, UeRrc};

/// RRC and CCM of one UE, wired together.
#[derive(Debug)]
pub struct UeCcmStack {
    rrc: Rc<UeRrc>,
    ccm: Rc<UeComponentCarrierManager>,
}

impl UeCcmStack {
    /// Builds a stack from a validated configuration.
    pub fn from_config(config: &UeCcmConfig) -> Result<Self, Error> {
        config.validate()?;

        let rrc = UeRrc::new(config.carrier_ids());
        let ccm = UeComponentCarrierManager::from_config(config);
        info!(
            carriers = config.component_carriers.len(),
            algorithm = %config.ccm_algorithm,
            "UE carrier aggregation stack created"
        );
        Ok(Self::connect(rrc, ccm))
    }

    /// Connects an existing RRC and CCM through the SAP adapters.
    pub fn connect(rrc: Rc<UeRrc>, ccm: Rc<UeComponentCarrierManager>) -> Self {
        rrc.set_ccm_rrc_sap_provider(ccm.ccm_rrc_sap_provider());
        ccm.set_ccm_rrc_sap_user(rrc.ccm_rrc_sap_user());
        Self { rrc, ccm }
    }

    /// The UE RRC.
    pub fn rrc(&self) -> &Rc<UeRrc> {
        &self.rrc
    }

    /// The UE component carrier manager.
    pub fn ccm(&self) -> &Rc<UeComponentCarrierManager> {
        &self.ccm
    }

    /// Switches the CCM distribution algorithm for channels added from now on.
    pub fn switch_ccm_algorithm(&self, algorithm: CcmAlgorithm) {
        self.ccm.set_policy(policy_for(algorithm));
    }

    /// Applies a reconfiguration that adds secondary carriers without
    /// explicit activation, and lets the CCM decide what to enable.
    ///
    /// Returns the carriers activated as a result.
    pub fn reconfigure_secondary_carriers(
        &self,
        added: &[ComponentCarrierId],
    ) -> Result<CarrierIdSet, RrcError> {
        self.rrc.configure_secondary_carriers(added);

        let mut configured = self.ccm.configured_carriers();
        configured.extend(added.iter().copied());
        self.ccm.set_configured_carriers(configured);

        self.rrc.complete_reconfiguration()?;
        Ok(self.rrc.process_pending_carrier_enabling())
    }
}
