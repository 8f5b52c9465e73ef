//! Event bus: Typed notifications between debug model and memory views.
//!
//! Producers (the debug model, a target poller) publish [`MemoryEvent`]s;
//! each view holds a [`Subscription`] and pumps it on its own thread.
//!
//! ```text
//! ┌─────────────┐  MemoryEvent  ┌──────────┐  Subscription  ┌────────────────┐
//! │ Debug model │ ────────────▶ │ EventBus │ ─────────────▶ │ ContentTracker │
//! └─────────────┘               └──────────┘                └────────────────┘
//! ```

mod bus;
mod messages;

pub use bus::{EventBus, SubscriberId, Subscription};
pub use messages::MemoryEvent;
