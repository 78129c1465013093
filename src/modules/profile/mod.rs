//! Multi-tenant user profiles.
//!
//! [`ProfileStore`] is the data-access contract and has two implementations:
//! [`DieselProfileStore`] (relational, pooled) and [`MemoryProfileStore`]. [`ProfileService`]
//! is the seam callers use; it forwards to whichever store it was given and reports every call
//! to a [`ProfileEventSink`].
//!
//! Every read and write is scoped by `tenant_id`. Email and mobile numbers are unique across all
//! tenants, not per tenant.

pub mod events;
pub mod request;
pub mod service;
pub mod store;

pub use events::{EventOutcome, LogEventSink, ProfileEvent, ProfileEventSink, ProfileOperation};
pub use service::ProfileService;
#[cfg(feature = "diesel")]
pub use store::diesel::DieselProfileStore;
pub use store::memory::MemoryProfileStore;
pub use store::{
    Profile, ProfileBuilder, ProfileKey, ProfilePatch, ProfileStore, ProfileStoreError,
};
