//! Definiciones de eventos y trait EventStore.

mod types;
mod store;

pub use types::{FormEvent, FormEventKind};
pub use store::EventStore;
pub use store::InMemoryEventStore;
