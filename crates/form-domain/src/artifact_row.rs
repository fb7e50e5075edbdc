// artifact_row.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ArtifactKind;

/// Fila de artefacto externo. El `value` es el nombre de archivo o la URI
/// según el `kind` activo; cadena vacía significa "sin valor". El valor está
/// ligado al kind: cambiar de kind lo descarta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalArtifactRow {
    id: u32,
    kind: ArtifactKind,
    value: String,
}

impl ExternalArtifactRow {
    pub(crate) fn new(id: u32) -> Self {
        ExternalArtifactRow { id,
                              kind: ArtifactKind::default(),
                              value: String::new() }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Indica si la fila aporta un valor para su kind activo.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Cambia el kind de la fila. Si realmente cambia, el valor anterior se
    /// descarta; devuelve `true` en ese caso.
    pub(crate) fn set_kind(&mut self, kind: ArtifactKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        self.value.clear();
        true
    }

    pub(crate) fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl fmt::Display for ExternalArtifactRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<row {}: {} [{}]>", self.id, self.kind, if self.has_value() { "set" } else { "empty" })
    }
}
