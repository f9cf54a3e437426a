//! # Priority Event Bus
//!
//! Synchronous, in-process publish/subscribe keyed on the exact event type.
//!
//! ## Features
//!
//! - **Type Safety**: Listeners receive `&mut E` for the type they registered
//! - **Priority Ordering**: Higher priority runs first, ties in registration order
//! - **Cancellation**: Cancelable events stop delivery once a listener cancels them
//! - **Multi-threaded**: Subscribe and post concurrently; posts iterate snapshots
//! - **Fail-fast**: A listener error ends the post and is returned unchanged
//!
//! ## Example
//!
//! ```rust
//! use priority_event_bus::{Cancelable, CancelFlag, Event, EventBus};
//!
//! struct OrderEvent {
//!     symbol: String,
//!     cancel: CancelFlag,
//! }
//!
//! impl Event for OrderEvent {
//!     fn cancelable(&self) -> Option<&dyn Cancelable> {
//!         Some(&self.cancel)
//!     }
//! }
//!
//! let bus = EventBus::new();
//!
//! // Risk check runs before routing and can veto the order
//! bus.listen::<OrderEvent>()
//!     .priority(10)
//!     .subscribe(|order| {
//!         if order.symbol.is_empty() {
//!             order.cancel.cancel();
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! bus.listen::<OrderEvent>()
//!     .subscribe(|order| {
//!         println!("routing {}", order.symbol);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let mut order = OrderEvent { symbol: String::new(), cancel: CancelFlag::new() };
//! let delivery = bus.post(&mut order).unwrap();
//! assert!(delivery.canceled);
//! assert_eq!(delivery.invoked, 1);
//! ```

pub mod builder;
pub mod bus;
pub mod category;
pub mod config;
pub mod error;
pub mod events;
pub mod listener;
pub mod registry;

// Re-exports
pub use builder::ListenerBuilder;
pub use bus::{Delivery, EventBus};
pub use category::Category;
pub use config::BusConfig;
pub use error::BusError;
pub use events::{CancelFlag, Cancelable, Event};
pub use listener::{ListenerEntry, ListenerId, DEFAULT_PRIORITY};
pub use registry::{ListenerSnapshot, Registry};
