//! Tipos de evento del formulario y estructura `FormEvent`.
//!
//! Rol en el flujo:
//! - Cada acción de usuario que el `FormEngine` acepta se emite como evento a
//!   un `EventStore` append-only.
//! - El `FormRepository` reconstruye la `FormInstance` por replay lineal de
//!   estos eventos; nada del estado vive fuera del log.
//! - Los eventos marcados `forced` los emite el propio motor al aplicar una
//!   política (fila mínima obligatoria, reset del modo de combinación), no
//!   una acción directa del usuario.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use form_domain::{ArtifactKind, CombinationMode, ContentKind};

/// Tipos de eventos del formulario de carga.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FormEventKind {
    /// Alta de un formulario: fija el `profile_hash` y la cantidad de
    /// opciones del selector. Invariante: debe ser el primer evento de un
    /// `form_id`.
    FormInitialized { profile_hash: String, option_count: usize },
    /// Cambio de selección del tipo de validación (`None` = sin selección).
    ValidationTypeSelected { value: Option<String> },
    /// Cambio del tipo de entrada principal (archivo, URI o texto en línea).
    ContentKindChanged { kind: ContentKind },
    /// Nuevo valor para la entrada principal de un kind concreto. Los tres
    /// valores se conservan de forma independiente, como los inputs ocultos
    /// del formulario original.
    PrimaryValueChanged { kind: ContentKind, value: String },
    /// Alta de una fila de artefacto externo con el id asignado por la
    /// colección. `forced` si la agregó la política `Required`.
    ArtifactRowAdded { row_id: u32, forced: bool },
    /// Baja de una fila de artefacto externo.
    ArtifactRowRemoved { row_id: u32 },
    /// Cambio de kind de una fila; el valor anterior se descarta en replay.
    ArtifactRowKindChanged { row_id: u32, kind: ArtifactKind },
    /// Nuevo valor de una fila para su kind activo.
    ArtifactRowValueChanged { row_id: u32, value: String },
    /// Eliminación de todas las filas (cambio de tipo de validación).
    /// `removed` es informativo; la marca de agua de ids se conserva.
    ArtifactRowsReset { removed: usize },
    /// Cambio del modo de combinación. `forced` si lo repuso el motor al
    /// ocultarse el control.
    CombinationModeChanged { mode: CombinationMode, forced: bool },
    /// Cambio del checkbox "incluir artefactos externos" (política Optional).
    /// `forced` si lo desmarcó el motor al cambiar el tipo de validación.
    IncludeExternalToggled { include: bool, forced: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEvent {
    pub seq: u64, // asignado por EventStore in-memory (orden append)
    pub form_id: Uuid,
    pub kind: FormEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
