//! The pull/push messaging fabric.
//!
//! - [`PullReactable`]: one responder per id answers synchronous requests.
//! - [`PushReactable`]: every subscriber of an id receives a payload by
//!   reference, synchronously, in subscription order.
//! - [`Subscription`]: the handle returned by both; unsubscribing is
//!   idempotent and dropping the handle unsubscribes.
//! - [`MessageBus`]: all channels the batching core uses, bundled.

mod bus;
mod ids;
mod pull;
mod push;
mod subscription;

pub use bus::{BatchChannels, MessageBus};
pub use ids::MessageId;
pub use pull::{PullReactable, PullResponder};
pub use push::{PushReactable, PushReceiver};
pub use subscription::Subscription;
