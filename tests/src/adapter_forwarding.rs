//! Member adapter integration tests
//!
//! The adapters must forward every primitive unchanged, whatever the owner,
//! and the RRC must keep working when the CCM behind its provider changes.

use std::cell::RefCell;
use std::rc::Rc;

use integration_tests::{drb_config, init_test_logging, MockRlc, TestCarrierLayout, TestResult};
use ltesim_common::{CcmAlgorithm, ComponentCarrierId, LogicalChannelId};
use ltesim_sap::{
    carriers_of, CarrierIdSet, CcmRrcSapProvider, CcmRrcSapProviderOwner, CcmRrcSapUser,
    CcmRrcSapUserOwner, LcsConfig, LogicalChannelConfig, MacSapUserHandle,
    MemberCcmRrcSapProvider, MemberCcmRrcSapUser, SapError,
};
use ltesim_ue::{policy_for, RrcError, UeComponentCarrierManager, UeRrc};

/// CCM stand-in that puts every channel on carrier `lc_id % 3`.
#[derive(Default)]
struct ModuloCcm {
    calls: RefCell<Vec<String>>,
    bound: RefCell<Vec<(LogicalChannelId, ComponentCarrierId)>>,
}

impl CcmRrcSapProviderOwner for ModuloCcm {
    fn do_add_lc(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, SapError> {
        self.calls.borrow_mut().push(format!("add {lc_id}"));
        let cc = ComponentCarrierId(lc_id.0 % 3);
        self.bound.borrow_mut().push((lc_id, cc));
        Ok(vec![LcsConfig::new(cc, lc_config, msu)])
    }

    fn do_remove_lc(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, SapError> {
        self.calls.borrow_mut().push(format!("remove {lc_id}"));
        let mut bound = self.bound.borrow_mut();
        let pos = bound
            .iter()
            .position(|(id, _)| *id == lc_id)
            .ok_or(SapError::UnknownChannel(lc_id))?;
        let (_, cc) = bound.remove(pos);
        Ok(CarrierIdSet::from([cc]))
    }

    fn do_notify_connection_reconfiguration(&self) {
        self.calls.borrow_mut().push("reconfiguration".to_string());
    }

    fn do_configure_signal_bearer(
        &self,
        lc_id: LogicalChannelId,
        _lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, SapError> {
        self.calls.borrow_mut().push(format!("srb {lc_id}"));
        Ok(msu)
    }
}

#[derive(Default)]
struct EnablingLog {
    lists: RefCell<Vec<Vec<ComponentCarrierId>>>,
}

impl CcmRrcSapUserOwner for EnablingLog {
    fn do_component_carrier_enabling(&self, component_carrier_list: Vec<ComponentCarrierId>) {
        self.lists.borrow_mut().push(component_carrier_list);
    }
}

#[test]
fn test_provider_adapter_matches_direct_calls() -> TestResult {
    init_test_logging();

    let direct = Rc::new(ModuloCcm::default());
    let adapted = Rc::new(ModuloCcm::default());
    let provider: Rc<dyn CcmRrcSapProvider> = Rc::new(MemberCcmRrcSapProvider::new(&adapted));
    let rlc = MockRlc::new(7);

    let expected = direct.do_add_lc(rlc.lc_id(), drb_config(), rlc.handle())?;
    let actual = provider.add_lc(rlc.lc_id(), drb_config(), rlc.handle())?;
    assert_eq!(actual, expected);
    assert_eq!(carriers_of(&actual), CarrierIdSet::from([ComponentCarrierId(1)]));

    let expected_sink = direct.do_configure_signal_bearer(
        LogicalChannelId(1),
        LogicalChannelConfig::signaling(),
        rlc.handle(),
    )?;
    let actual_sink = provider.configure_signal_bearer(
        LogicalChannelId(1),
        LogicalChannelConfig::signaling(),
        rlc.handle(),
    )?;
    assert_eq!(actual_sink, expected_sink);

    direct.do_notify_connection_reconfiguration();
    provider.notify_connection_reconfiguration();

    assert_eq!(
        provider.remove_lc(rlc.lc_id()),
        direct.do_remove_lc(rlc.lc_id())
    );
    assert_eq!(
        provider.remove_lc(rlc.lc_id()),
        direct.do_remove_lc(rlc.lc_id())
    );

    assert_eq!(*adapted.calls.borrow(), *direct.calls.borrow());
    Ok(())
}

#[test]
fn test_user_adapter_forwards_lists_unchanged() {
    init_test_logging();

    let owner = Rc::new(EnablingLog::default());
    let user: Rc<dyn CcmRrcSapUser> = Rc::new(MemberCcmRrcSapUser::new(&owner));

    user.component_carrier_enabling(vec![ComponentCarrierId(2), ComponentCarrierId(1)]);
    user.component_carrier_enabling(Vec::new());

    assert_eq!(
        *owner.lists.borrow(),
        vec![vec![ComponentCarrierId(2), ComponentCarrierId(1)], Vec::new()]
    );
}

#[test]
fn test_rrc_against_custom_ccm() -> TestResult {
    init_test_logging();

    let rrc = UeRrc::new(CarrierIdSet::from([
        ComponentCarrierId(0),
        ComponentCarrierId(1),
        ComponentCarrierId(2),
    ]));
    let ccm = Rc::new(ModuloCcm::default());
    rrc.set_ccm_rrc_sap_provider(Rc::new(MemberCcmRrcSapProvider::new(&ccm)));

    let rlc = MockRlc::new(5);
    let bindings = rrc.add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle())?;
    assert_eq!(carriers_of(&bindings), CarrierIdSet::from([ComponentCarrierId(2)]));
    assert_eq!(rrc.channels_on(ComponentCarrierId(2)), vec![LogicalChannelId(5)]);

    rrc.release_bearer(rlc.lc_id())?;
    assert!(rrc.channels_on(ComponentCarrierId(2)).is_empty());
    assert_eq!(*ccm.calls.borrow(), vec!["add LCID-5", "remove LCID-5"]);
    Ok(())
}

#[test]
fn test_swap_ccm_at_runtime() -> TestResult {
    init_test_logging();

    let carriers = TestCarrierLayout::two_carriers().build().carrier_ids();
    let rrc = UeRrc::new(carriers.clone());

    let split = UeComponentCarrierManager::new(
        carriers.clone(),
        policy_for(CcmAlgorithm::SplitAcrossCarriers),
    );
    let primary_only = UeComponentCarrierManager::new(
        carriers,
        policy_for(CcmAlgorithm::PrimaryCarrierOnly),
    );

    rrc.set_ccm_rrc_sap_provider(split.ccm_rrc_sap_provider());
    let first = MockRlc::new(3);
    let bindings = rrc.add_data_bearer(first.lc_id(), drb_config(), first.handle())?;
    assert_eq!(bindings.len(), 2);

    rrc.set_ccm_rrc_sap_provider(primary_only.ccm_rrc_sap_provider());
    let second = MockRlc::new(4);
    let bindings = rrc.add_data_bearer(second.lc_id(), drb_config(), second.handle())?;
    assert_eq!(carriers_of(&bindings), CarrierIdSet::from([ComponentCarrierId(0)]));

    // Each CCM only knows the channels added through it
    assert_eq!(split.routed_channels(), vec![LogicalChannelId(3)]);
    assert_eq!(primary_only.routed_channels(), vec![LogicalChannelId(4)]);
    Ok(())
}

#[test]
fn test_dropped_ccm_detaches_provider() {
    init_test_logging();

    let rrc = UeRrc::new(CarrierIdSet::from([ComponentCarrierId(0)]));
    let ccm = UeComponentCarrierManager::from_config(&TestCarrierLayout::default().build());
    rrc.set_ccm_rrc_sap_provider(ccm.ccm_rrc_sap_provider());
    drop(ccm);

    let rlc = MockRlc::new(3);
    assert_eq!(
        rrc.add_data_bearer(rlc.lc_id(), drb_config(), rlc.handle()),
        Err(RrcError::Sap(SapError::OwnerDetached("CCM")))
    );
    // Unit primitives are dropped without failing
    assert!(rrc.complete_reconfiguration().is_ok());
}
