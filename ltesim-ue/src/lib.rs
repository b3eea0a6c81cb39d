//! ltesim UE (User Equipment) carrier aggregation library
//!
//! This crate provides the UE layers that meet at the CCM-RRC SAP:
//!
//! - Component carrier manager with interchangeable distribution policies
//! - RRC bearer handling and per-carrier MAC bookkeeping
//! - A stack builder wiring both through the SAP member adapters

pub mod ccm;
pub mod rrc;
pub mod stack;

// Re-export CCM types
pub use ccm::{
    policy_for, CarrierDistributionPolicy, CcmMacSapUser, LcKind, LcRoute, PrimaryCarrierOnly,
    SplitAcrossCarriers, UeComponentCarrierManager,
};

// Re-export RRC types
pub use rrc::{CarrierMacState, RrcError, SignalingBearer, UeRrc};

pub use stack::UeCcmStack;
