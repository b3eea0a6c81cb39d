//! MAC SAP data types and the MAC data sink capability
//!
//! The MAC SAP user is the callback target through which data for one
//! logical channel flows between the RLC and the per-carrier MAC layers.
//! It is created and owned by the RLC entity; the CCM and MAC layers hold
//! [`MacSapUserHandle`]s, which never keep the sink alive.

use std::fmt;
use std::rc::{Rc, Weak};

use bytes::Bytes;
use ltesim_common::{ComponentCarrierId, LogicalChannelId};
use serde::{Deserialize, Serialize};

/// Prioritized bit rate value meaning "infinity".
pub const PBR_INFINITY: u16 = 65535;

/// Bucket size duration value meaning "infinity".
pub const BUCKET_SIZE_INFINITY: u16 = 65535;

/// MAC logical channel configuration.
///
/// Copied by value into every carrier binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalChannelConfig {
    /// Logical channel priority (1 = highest)
    pub priority: u8,
    /// Prioritized bit rate in kbit/s
    pub prioritized_bit_rate_kbps: u16,
    /// Token bucket size duration in ms
    pub bucket_size_duration_ms: u16,
    /// Logical channel group used for buffer status reporting
    pub logical_channel_group: u8,
}

impl LogicalChannelConfig {
    /// Creates a logical channel configuration.
    pub fn new(
        priority: u8,
        prioritized_bit_rate_kbps: u16,
        bucket_size_duration_ms: u16,
        logical_channel_group: u8,
    ) -> Self {
        Self {
            priority,
            prioritized_bit_rate_kbps,
            bucket_size_duration_ms,
            logical_channel_group,
        }
    }

    /// The fixed configuration of the signaling bearer.
    pub fn signaling() -> Self {
        Self::new(1, PBR_INFINITY, BUCKET_SIZE_INFINITY, 0)
    }
}

/// Parameters of a transmission opportunity notified by MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOpportunity {
    /// Number of bytes the RLC may send
    pub bytes: u32,
    /// Spatial layer of the transmission
    pub layer: u8,
    /// HARQ process ID
    pub harq_id: u8,
    /// Carrier on which the opportunity arises
    pub component_carrier_id: ComponentCarrierId,
    /// C-RNTI of the UE
    pub rnti: u16,
    /// Logical channel the opportunity is for
    pub lc_id: LogicalChannelId,
}

/// A PDU delivered up from MAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPdu {
    /// PDU payload
    pub pdu: Bytes,
    /// C-RNTI of the UE
    pub rnti: u16,
    /// Logical channel the PDU belongs to
    pub lc_id: LogicalChannelId,
}

/// MAC SAP user: the data sink for one logical channel.
///
/// Implemented by whichever layer originates the data (usually RLC).
pub trait MacSapUser {
    /// MAC grants a transmission opportunity.
    fn notify_tx_opportunity(&self, params: TxOpportunity);

    /// HARQ delivery failed for a previously transmitted PDU.
    fn notify_harq_delivery_failure(&self);

    /// MAC delivers a received PDU.
    fn receive_pdu(&self, params: ReceivedPdu);
}

/// Non-owning reference to a [`MacSapUser`].
///
/// Two handles are equal when they refer to the same sink.
#[derive(Clone)]
pub struct MacSapUserHandle(Weak<dyn MacSapUser>);

impl MacSapUserHandle {
    /// Creates a handle to a concrete sink.
    pub fn new<T: MacSapUser + 'static>(sink: &Rc<T>) -> Self {
        let weak: Weak<dyn MacSapUser> = Rc::<T>::downgrade(sink);
        Self(weak)
    }

    /// Creates a handle to a type-erased sink.
    pub fn from_dyn(sink: &Rc<dyn MacSapUser>) -> Self {
        Self(Rc::downgrade(sink))
    }

    /// Returns the sink if its owner still holds it.
    pub fn upgrade(&self) -> Option<Rc<dyn MacSapUser>> {
        self.0.upgrade()
    }

    /// Returns true while the originating owner keeps the sink alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Returns true if both handles refer to the same sink.
    pub fn ptr_eq(&self, other: &MacSapUserHandle) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for MacSapUserHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for MacSapUserHandle {}

impl fmt::Debug for MacSapUserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacSapUserHandle(alive={})", self.is_alive())
    }
}
