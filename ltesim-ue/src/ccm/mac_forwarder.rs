//! CCM-side MAC SAP user
//!
//! The CCM hands this sink to the MAC instead of the RLC's own sink when it
//! interposes on a channel. MAC callbacks are routed by LCID to the RLC sink
//! recorded in the CCM routing table.

use std::rc::{Rc, Weak};

use ltesim_common::{log_sap_pdu, Direction, LogicalChannelId};
use ltesim_sap::{MacSapUser, ReceivedPdu, TxOpportunity};
use tracing::{debug, warn};

use super::manager::UeComponentCarrierManager;

/// MAC SAP user owned by the CCM.
pub struct CcmMacSapUser {
    ccm: Weak<UeComponentCarrierManager>,
}

impl CcmMacSapUser {
    pub(crate) fn new(ccm: Weak<UeComponentCarrierManager>) -> Self {
        Self { ccm }
    }

    fn rlc_sink(&self, lc_id: LogicalChannelId) -> Option<Rc<dyn MacSapUser>> {
        let ccm = self.ccm.upgrade()?;
        let handle = ccm.rlc_sink(lc_id)?;
        handle.upgrade()
    }
}

impl MacSapUser for CcmMacSapUser {
    fn notify_tx_opportunity(&self, params: TxOpportunity) {
        match self.rlc_sink(params.lc_id) {
            Some(sink) => sink.notify_tx_opportunity(params),
            None => warn!(
                lcid = %params.lc_id,
                cc = %params.component_carrier_id,
                "Tx opportunity for unrouted logical channel dropped"
            ),
        }
    }

    fn notify_harq_delivery_failure(&self) {
        debug!("HARQ delivery failure reported to CCM");
    }

    fn receive_pdu(&self, params: ReceivedPdu) {
        log_sap_pdu("MAC", Direction::Up, &params.pdu);
        match self.rlc_sink(params.lc_id) {
            Some(sink) => sink.receive_pdu(params),
            None => warn!(lcid = %params.lc_id, "PDU for unrouted logical channel dropped"),
        }
    }
}
