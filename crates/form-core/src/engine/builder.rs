//! Builder para `FormEngine`.
//!
//! Patrón builder en dos estados que obliga a configurar el perfil antes de
//! construir el motor.
//!
//! Notas de diseño
//! - `EngineBuilderInit` representa el estado inicial: stores (event_store +
//!   repository) presentes, perfil aún ausente.
//! - `EngineBuilder<E, R>` ya tiene el perfil; `build` lo fija en el engine.
//! - No hay acciones posibles sobre un engine sin perfil: los métodos del
//!   motor devuelven `MissingProfile` si se construye por fuera del builder
//!   (`new_with_stores`) y no se configura después.
//!
//! Ejemplo de uso (comentario):
//!
//! ```ignore
//! // Construcción típica:
//! // let engine = FormEngine::new()
//! //     .profile(build_form_profile(options, "schema", CombinationMode::AllOf))
//! //     .build();
//! ```

use crate::engine::FormEngine;
use crate::event::EventStore;
use crate::repo::{FormProfile, FormRepository};

/// Estado inicial del builder.
///
/// Contiene las stores necesarias para crear un `FormEngine`. Antes de poder
/// construir, el perfil del formulario debe estar definido.
pub struct EngineBuilderInit<E: EventStore, R: FormRepository> {
    /// Store de eventos que usará el engine.
    pub event_store: E,
    /// Repositorio de replay del formulario.
    pub repository: R,
}

impl<E: EventStore, R: FormRepository> EngineBuilderInit<E, R> {
    /// Define el perfil del formulario y transiciona al builder completo.
    #[inline]
    pub fn profile(self, profile: FormProfile) -> EngineBuilder<E, R> {
        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        profile }
    }
}

/// Builder principal: stores más perfil.
pub struct EngineBuilder<E: EventStore, R: FormRepository> {
    event_store: E,
    repository: R,
    profile: FormProfile,
}

impl<E: EventStore, R: FormRepository> EngineBuilder<E, R> {
    /// Construye el `FormEngine` final con el perfil como definición por
    /// defecto. Consume el builder.
    #[inline]
    pub fn build(self) -> FormEngine<E, R> {
        let mut engine = FormEngine::new_with_stores(self.event_store, self.repository);
        engine.set_profile(self.profile);
        engine
    }
}
