//! ltesim UE CCM-RRC Service Access Points
//!
//! This crate defines the contract between the UE RRC and the UE component
//! carrier manager (CCM) used for carrier aggregation:
//!
//! - [`ccm_rrc`]: the two SAP traits and the per-carrier binding record
//! - [`mac`]: the MAC data sink capability and logical channel configuration
//! - [`member`]: generic adapters that let any owner object serve a SAP
//! - [`error`]: failure outcomes of the SAP primitives
//!
//! All primitives are synchronous and run to completion on the simulation's
//! single thread of control.

pub mod ccm_rrc;
pub mod error;
pub mod mac;
pub mod member;

pub use ccm_rrc::{carriers_of, CarrierIdSet, CcmRrcSapProvider, CcmRrcSapUser, LcsConfig};
pub use error::SapError;
pub use mac::{
    LogicalChannelConfig, MacSapUser, MacSapUserHandle, ReceivedPdu, TxOpportunity,
    BUCKET_SIZE_INFINITY, PBR_INFINITY,
};
pub use member::{
    CcmRrcSapProviderOwner, CcmRrcSapUserOwner, MemberCcmRrcSapProvider, MemberCcmRrcSapUser,
};
