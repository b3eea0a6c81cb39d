//! RRC (Radio Resource Control) Module for UE, carrier aggregation part
//!
//! This module implements the RRC side of the CCM-RRC SAP:
//! - Signaling and data bearer setup through the component carrier manager
//! - Per-carrier MAC logical channel bookkeeping
//! - Secondary carrier enabling requested by the CCM
//!
//! # Bearer lifecycle
//!
//! ```text
//!   RRC                       CCM                     MAC (per carrier)
//!    │  ConfigureSignalBearer  │                              │
//!    │────────────────────────►│  binding on primary          │
//!    │◄──── CCM sink ──────────│─────────────────────────────►│
//!    │  AddLc                  │                              │
//!    │────────────────────────►│  one binding per carrier     │
//!    │◄──── [LcsConfig] ───────│─────────────────────────────►│
//!    │  RemoveLc               │                              │
//!    │────────────────────────►│                              │
//!    │◄──── {carrier ids} ─────│   (RRC clears MAC state)     │
//!    │  NotifyReconfiguration  │                              │
//!    │────────────────────────►│                              │
//!    │◄ ComponentCarrierEnabling (queued, acted on later)     │
//! ```
//!
//! The RRC state machine itself (connection setup, release) is not modelled
//! here.

pub mod carrier;
pub mod ue_rrc;

pub use carrier::CarrierMacState;
pub use ue_rrc::{RrcError, SignalingBearer, UeRrc};
