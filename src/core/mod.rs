//! Protocol core: demand, terminal signals, and the three roles.
//!
//! Everything else in the crate is built from these types:
//! - [`Demand`]: additive flow-control amount (finite or unbounded);
//! - [`Completion`]: the single terminal signal (`Finished` / `Failure(E)`);
//! - [`Subscription`] / [`Cancellable`]: producer-side handle (`request`, `cancel`);
//! - [`Subscriber`]: consumer (`receive_subscription`, `receive`, `receive_completion`);
//! - [`Publisher`]: attaches subscribers;
//! - [`AnyCancellable`]: cancel-on-drop handle.
//!
//! ## Wiring
//! ```text
//! Publisher::subscribe(S)
//!     └─► S::receive_subscription(sub)
//!             └─► sub.request(n) ──► S::receive(v) ──► ... ──► S::receive_completion(c)
//!                     ▲                    │
//!                     └── returned Demand ─┘ (added to outstanding demand)
//! ```

mod cancellable;
mod completion;
mod demand;
mod publisher;
mod subscriber;
mod subscription;
pub(crate) mod sync;

pub use cancellable::AnyCancellable;
pub use completion::{Completion, Never};
pub use demand::Demand;
pub use publisher::Publisher;
pub use subscriber::{AnySubscriber, Subscriber};
pub use subscription::{Cancellable, EmptySubscription, Subscription, SubscriptionRef, Subscriptions};
