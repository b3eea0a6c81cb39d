//! UE Component Carrier Manager (CCM)
//!
//! The CCM sits between the RRC and the per-carrier MAC instances and
//! decides on which component carriers each logical channel is mapped.
//!
//! - [`manager`]: routing table and the CCM side of the CCM-RRC SAP
//! - [`policy`]: interchangeable carrier distribution policies
//! - [`mac_forwarder`]: the CCM's own MAC SAP user used when it interposes

pub mod mac_forwarder;
pub mod manager;
pub mod policy;

pub use mac_forwarder::CcmMacSapUser;
pub use manager::{LcKind, LcRoute, UeComponentCarrierManager};
pub use policy::{policy_for, CarrierDistributionPolicy, PrimaryCarrierOnly, SplitAcrossCarriers};
