// artifact_kind.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origen del valor de una fila de artefacto externo. Las filas sólo admiten
/// archivo o URI; el texto en línea es exclusivo de la entrada principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    #[serde(rename = "fileType")]
    File,
    #[serde(rename = "uriType")]
    Uri,
}

impl ArtifactKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ArtifactKind::File => "fileType",
            ArtifactKind::Uri => "uriType",
        }
    }
}

/// Cada fila nueva se crea en modo archivo.
impl Default for ArtifactKind {
    fn default() -> Self {
        ArtifactKind::File
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}
