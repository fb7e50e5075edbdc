//! form-core: Motor de estado del formulario de carga (UF1)
pub mod constants;
pub mod derive;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod repo;


pub use derive::{combination_state, derive_view, section_state, CombinationState, FormView, RowView, SectionState};
pub use engine::{EngineBuilder, EngineBuilderInit, FormCtx, FormEngine};
pub use errors::FormEngineError;
pub use event::{EventStore, FormEvent, FormEventKind, InMemoryEventStore};
pub use repo::{build_form_profile, FormInstance, FormProfile, FormRepository, InMemoryFormRepository};
