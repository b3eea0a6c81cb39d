//! Carrier aggregation integration tests
//!
//! Drives a wired UE stack (RRC <-> CCM through the SAP adapters) through
//! the bearer lifecycle:
//! - Data bearers split across carriers and released again
//! - Signaling bearer setup and its interposed sink
//! - Secondary carrier enabling after reconfiguration

use bytes::Bytes;
use integration_tests::{drb_config, init_test_logging, MockRlc, MockRlcEvent, TestCarrierLayout};
use ltesim_common::{CcmAlgorithm, ComponentCarrierId, LogicalChannelId};
use ltesim_sap::{carriers_of, CarrierIdSet, ReceivedPdu, SapError, TxOpportunity};
use ltesim_ue::{RrcError, UeCcmStack};

fn carriers(ids: &[u8]) -> CarrierIdSet {
    ids.iter().copied().map(ComponentCarrierId).collect()
}

/// Two carriers, split policy: add LC 3, remove it, remove it again.
#[test]
fn test_split_bearer_scenario() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    let provider = stack.ccm().ccm_rrc_sap_provider();
    let sink_a = MockRlc::new(3);

    let bindings = provider
        .add_lc(LogicalChannelId(3), drb_config(), sink_a.handle())
        .unwrap();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].component_carrier_id, ComponentCarrierId(0));
    assert_eq!(bindings[1].component_carrier_id, ComponentCarrierId(1));
    for binding in &bindings {
        assert_eq!(binding.lc_config, drb_config());
        assert_eq!(binding.msu, sink_a.handle());
    }

    assert_eq!(provider.remove_lc(LogicalChannelId(3)), Ok(carriers(&[0, 1])));
    assert_eq!(
        provider.remove_lc(LogicalChannelId(3)),
        Err(SapError::UnknownChannel(LogicalChannelId(3)))
    );
}

#[test]
fn test_bindings_distinct_and_configured() {
    init_test_logging();

    let layout = TestCarrierLayout::default().with_carriers(&[0, 1, 2, 3]);
    let stack = UeCcmStack::from_config(&layout.build()).unwrap();
    let rlcs: Vec<_> = (3..8).map(MockRlc::new).collect();

    for rlc in &rlcs {
        let bindings = stack
            .rrc()
            .add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle())
            .unwrap();
        assert!(!bindings.is_empty());

        let ids = carriers_of(&bindings);
        assert_eq!(ids.len(), bindings.len(), "carrier ids must be pairwise distinct");
        assert!(ids.is_subset(&stack.ccm().configured_carriers()));
    }
}

#[test]
fn test_remove_returns_most_recent_bindings() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    let rlc = MockRlc::new(4);

    stack
        .rrc()
        .add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle())
        .unwrap();
    stack.rrc().release_bearer(rlc.lc_id()).unwrap();

    // Re-added under a different policy; removal reflects the new mapping
    stack.switch_ccm_algorithm(CcmAlgorithm::PrimaryCarrierOnly);
    let bindings = stack
        .rrc()
        .add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle())
        .unwrap();

    assert_eq!(stack.rrc().release_bearer(rlc.lc_id()), Ok(carriers_of(&bindings)));
    assert_eq!(carriers_of(&bindings), carriers(&[0]));
}

#[test]
fn test_add_remove_add_matches_fresh_id() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    let reused = MockRlc::new(3);
    let fresh = MockRlc::new(5);

    stack
        .rrc()
        .add_data_bearer(reused.lc_id(), drb_config(), reused.handle())
        .unwrap();
    stack.rrc().release_bearer(reused.lc_id()).unwrap();

    let again = stack
        .rrc()
        .add_data_bearer(reused.lc_id(), drb_config(), reused.handle())
        .unwrap();
    let first_time = stack
        .rrc()
        .add_data_bearer(fresh.lc_id(), drb_config(), fresh.handle())
        .unwrap();

    assert_eq!(carriers_of(&again), carriers_of(&first_time));
    assert_eq!(
        stack.ccm().route(reused.lc_id()).unwrap().carriers,
        stack.ccm().route(fresh.lc_id()).unwrap().carriers
    );
    assert_eq!(
        stack.rrc().channels_on(ComponentCarrierId(1)),
        vec![LogicalChannelId(3), LogicalChannelId(5)]
    );
}

#[test]
fn test_release_unknown_bearer() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    assert_eq!(
        stack.rrc().release_bearer(LogicalChannelId(9)),
        Err(RrcError::Sap(SapError::UnknownChannel(LogicalChannelId(9))))
    );
}

#[test]
fn test_signaling_bearer_lifecycle() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    let srb_rlc = MockRlc::new(1);

    let ccm_sink = stack
        .rrc()
        .setup_signaling_bearer(srb_rlc.lc_id(), srb_rlc.handle())
        .unwrap();
    assert_eq!(ccm_sink, stack.ccm().mac_sap_user_handle());

    let second = stack
        .rrc()
        .setup_signaling_bearer(srb_rlc.lc_id(), srb_rlc.handle());
    assert_eq!(
        second,
        Err(RrcError::Sap(SapError::DuplicateSignalingBearer(LogicalChannelId(1))))
    );

    // MAC traffic on the primary carrier reaches the RLC through the CCM
    let mac_side = ccm_sink.upgrade().unwrap();
    mac_side.notify_tx_opportunity(TxOpportunity {
        bytes: 64,
        layer: 0,
        harq_id: 2,
        component_carrier_id: ComponentCarrierId(0),
        rnti: 17,
        lc_id: LogicalChannelId(1),
    });
    mac_side.receive_pdu(ReceivedPdu {
        pdu: Bytes::from_static(&[0x00, 0x04, 0x2a]),
        rnti: 17,
        lc_id: LogicalChannelId(1),
    });
    assert_eq!(srb_rlc.granted_bytes(), 64);
    assert_eq!(srb_rlc.received_pdus(), vec![Bytes::from_static(&[0x00, 0x04, 0x2a])]);

    // Release and set up again
    assert_eq!(stack.rrc().release_bearer(srb_rlc.lc_id()), Ok(carriers(&[0])));
    assert!(stack
        .rrc()
        .setup_signaling_bearer(srb_rlc.lc_id(), srb_rlc.handle())
        .is_ok());
}

#[test]
fn test_harq_failure_not_routed_to_rlc() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::default().build()).unwrap();
    let srb_rlc = MockRlc::new(1);
    let ccm_sink = stack
        .rrc()
        .setup_signaling_bearer(srb_rlc.lc_id(), srb_rlc.handle())
        .unwrap();

    ccm_sink.upgrade().unwrap().notify_harq_delivery_failure();
    assert!(!srb_rlc.events().contains(&MockRlcEvent::HarqDeliveryFailure));
}

#[test]
fn test_ccm_does_not_own_rlc_sink() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    let rlc = MockRlc::new(3);
    let bindings = stack
        .rrc()
        .add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle())
        .unwrap();

    drop(rlc);
    assert!(bindings.iter().all(|b| !b.msu.is_alive()));
    assert!(!stack.ccm().route(LogicalChannelId(3)).unwrap().rlc_sink.is_alive());
}

#[test]
fn test_no_carrier_available() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    stack.ccm().set_configured_carriers(CarrierIdSet::new());
    let rlc = MockRlc::new(3);

    assert_eq!(
        stack.rrc().add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle()),
        Err(RrcError::Sap(SapError::NoCarrierAvailable(LogicalChannelId(3))))
    );
}

#[test]
fn test_secondary_carrier_enabling_after_reconfiguration() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::two_carriers().build()).unwrap();
    assert_eq!(stack.rrc().active_carriers(), carriers(&[0]));

    stack.rrc().complete_reconfiguration().unwrap();
    // Enabling is queued, not applied within the call
    assert_eq!(stack.rrc().pending_carrier_enabling(), 1);
    assert_eq!(stack.rrc().active_carriers(), carriers(&[0]));

    assert_eq!(stack.rrc().process_pending_carrier_enabling(), carriers(&[1]));
    assert_eq!(stack.rrc().active_carriers(), carriers(&[0, 1]));

    // Second cycle: CCM reports an empty list, RRC does nothing
    stack.rrc().complete_reconfiguration().unwrap();
    assert_eq!(stack.rrc().pending_carrier_enabling(), 0);
    assert!(stack.rrc().process_pending_carrier_enabling().is_empty());
}

#[test]
fn test_empty_enabling_through_adapter() {
    init_test_logging();

    let stack = UeCcmStack::from_config(&TestCarrierLayout::default().build()).unwrap();
    let user = stack.rrc().ccm_rrc_sap_user();

    user.component_carrier_enabling(Vec::new());
    assert_eq!(stack.rrc().pending_carrier_enabling(), 0);
    assert_eq!(stack.rrc().active_carriers(), carriers(&[0]));
}
