//! Member adapters for the CCM-RRC SAP
//!
//! A member adapter implements one side of the SAP by forwarding every
//! primitive, unchanged, to the matching `do_*` method of an owner object.
//! The owner only implements the small owner trait; it never has to
//! implement the SAP trait itself, and one owner can hand out adapters to
//! several callers.
//!
//! The adapter keeps a [`Weak`] reference: it never extends the owner's
//! lifetime, and the owner is expected to outlive it.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use ltesim_common::ComponentCarrierId;
//! use ltesim_sap::{CcmRrcSapUser, CcmRrcSapUserOwner, MemberCcmRrcSapUser};
//!
//! #[derive(Default)]
//! struct Rrc {
//!     enabled: RefCell<Vec<ComponentCarrierId>>,
//! }
//!
//! impl CcmRrcSapUserOwner for Rrc {
//!     fn do_component_carrier_enabling(&self, list: Vec<ComponentCarrierId>) {
//!         self.enabled.borrow_mut().extend(list);
//!     }
//! }
//!
//! let rrc = Rc::new(Rrc::default());
//! let user: Rc<dyn CcmRrcSapUser> = Rc::new(MemberCcmRrcSapUser::new(&rrc));
//! user.component_carrier_enabling(vec![ComponentCarrierId(1)]);
//! assert_eq!(*rrc.enabled.borrow(), vec![ComponentCarrierId(1)]);
//! ```

use std::rc::{Rc, Weak};

use ltesim_common::{ComponentCarrierId, LogicalChannelId};

use crate::ccm_rrc::{CarrierIdSet, CcmRrcSapProvider, CcmRrcSapUser, LcsConfig};
use crate::error::SapError;
use crate::mac::{LogicalChannelConfig, MacSapUserHandle};

/// Methods a CCM implementation exposes to [`MemberCcmRrcSapProvider`].
pub trait CcmRrcSapProviderOwner {
    /// See [`CcmRrcSapProvider::add_lc`].
    fn do_add_lc(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, SapError>;

    /// See [`CcmRrcSapProvider::remove_lc`].
    fn do_remove_lc(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, SapError>;

    /// See [`CcmRrcSapProvider::notify_connection_reconfiguration`].
    fn do_notify_connection_reconfiguration(&self);

    /// See [`CcmRrcSapProvider::configure_signal_bearer`].
    fn do_configure_signal_bearer(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, SapError>;
}

/// Methods an RRC implementation exposes to [`MemberCcmRrcSapUser`].
pub trait CcmRrcSapUserOwner {
    /// See [`CcmRrcSapUser::component_carrier_enabling`].
    fn do_component_carrier_enabling(&self, component_carrier_list: Vec<ComponentCarrierId>);
}

/// [`CcmRrcSapProvider`] forwarding to a CCM owner of type `C`.
pub struct MemberCcmRrcSapProvider<C> {
    owner: Weak<C>,
}

impl<C> MemberCcmRrcSapProvider<C> {
    /// Creates an adapter bound to `owner`.
    pub fn new(owner: &Rc<C>) -> Self {
        Self {
            owner: Rc::downgrade(owner),
        }
    }

    fn owner(&self) -> Result<Rc<C>, SapError> {
        self.owner.upgrade().ok_or(SapError::OwnerDetached("CCM"))
    }
}

impl<C: CcmRrcSapProviderOwner> CcmRrcSapProvider for MemberCcmRrcSapProvider<C> {
    fn add_lc(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<Vec<LcsConfig>, SapError> {
        self.owner()?.do_add_lc(lc_id, lc_config, msu)
    }

    fn remove_lc(&self, lc_id: LogicalChannelId) -> Result<CarrierIdSet, SapError> {
        self.owner()?.do_remove_lc(lc_id)
    }

    fn notify_connection_reconfiguration(&self) {
        match self.owner.upgrade() {
            Some(owner) => owner.do_notify_connection_reconfiguration(),
            None => tracing::warn!("NotifyConnectionReconfiguration dropped, CCM owner gone"),
        }
    }

    fn configure_signal_bearer(
        &self,
        lc_id: LogicalChannelId,
        lc_config: LogicalChannelConfig,
        msu: MacSapUserHandle,
    ) -> Result<MacSapUserHandle, SapError> {
        self.owner()?.do_configure_signal_bearer(lc_id, lc_config, msu)
    }
}

/// [`CcmRrcSapUser`] forwarding to an RRC owner of type `C`.
pub struct MemberCcmRrcSapUser<C> {
    owner: Weak<C>,
}

impl<C> MemberCcmRrcSapUser<C> {
    /// Creates an adapter bound to `owner`.
    pub fn new(owner: &Rc<C>) -> Self {
        Self {
            owner: Rc::downgrade(owner),
        }
    }
}

impl<C: CcmRrcSapUserOwner> CcmRrcSapUser for MemberCcmRrcSapUser<C> {
    fn component_carrier_enabling(&self, component_carrier_list: Vec<ComponentCarrierId>) {
        match self.owner.upgrade() {
            Some(owner) => owner.do_component_carrier_enabling(component_carrier_list),
            None => tracing::warn!(
                carriers = component_carrier_list.len(),
                "ComponentCarrierEnabling dropped, RRC owner gone"
            ),
        }
    }
}
