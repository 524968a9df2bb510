//! Change notification for owner objects.
//!
//! ## Architecture
//! ```text
//!  struct Owner {
//!      changes: ObservableObjectPublisher ◄──────────┐ send() before each set
//!      a: Published<A> ── wired(.., &changes) ───────┤
//!      b: Published<B> ── wired(.., &changes) ───────┘
//!  }
//!
//!  owner.object_will_change().subscribe(..)   // one stream for all fields
//!  owner.a.publisher().subscribe(..)          // values of one field
//! ```
//!
//! Fields are wired explicitly when the owner is constructed; nothing is
//! discovered at runtime.

mod object_publisher;
mod published;

pub use object_publisher::ObservableObjectPublisher;
pub use published::{Published, PublishedPublisher};

/// An object that announces its changes through one publisher.
pub trait ObservableObject {
    /// The publisher that fires before any of the object's fields change.
    fn object_will_change(&self) -> ObservableObjectPublisher;
}
