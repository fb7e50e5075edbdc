//! Engine module for FormEngine implementation
//!
//! Provides the core engine, builder pattern, and form context for
//! deterministic upload-form state management.

pub mod core;
pub mod builder;
pub mod form_ctx;

pub use core::FormEngine;
pub use builder::{EngineBuilder, EngineBuilderInit};
pub use form_ctx::FormCtx;

pub use crate::event::{EventStore, FormEvent, FormEventKind, InMemoryEventStore};
pub use crate::repo::{FormProfile, FormRepository, InMemoryFormRepository};
