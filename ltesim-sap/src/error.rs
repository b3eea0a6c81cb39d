//! Errors reported across the CCM-RRC SAP

use ltesim_common::{ComponentCarrierId, LogicalChannelId};
use thiserror::Error;

/// Failure outcome of a CCM-RRC SAP primitive.
///
/// Every variant is reported synchronously to the immediate caller; the SAP
/// itself never retries or recovers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SapError {
    /// Removal or reconfiguration referenced a channel with no active binding
    #[error("unknown logical channel {0}")]
    UnknownChannel(LogicalChannelId),

    /// AddLc called for a channel that is already bound
    #[error("logical channel {0} is already bound")]
    ChannelAlreadyBound(LogicalChannelId),

    /// ConfigureSignalBearer called twice without an intervening removal
    #[error("signaling bearer already configured on {0}")]
    DuplicateSignalingBearer(LogicalChannelId),

    /// The distribution policy could not place the channel on any carrier
    #[error("no component carrier available for {0}")]
    NoCarrierAvailable(LogicalChannelId),

    /// A binding names a carrier that is not configured for the UE
    #[error("component carrier {0} is not configured")]
    InvalidCarrierReference(ComponentCarrierId),

    /// The owner behind a member adapter has already been dropped
    #[error("{0} owner no longer exists")]
    OwnerDetached(&'static str),
}
