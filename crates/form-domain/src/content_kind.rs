// content_kind.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Tipo de entrada principal del formulario: archivo, URI o texto editado en
/// línea. Los nombres de wire corresponden a los valores del selector
/// original (`fileType`, `uriType`, `stringType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "fileType")]
    File,
    #[serde(rename = "uriType")]
    Uri,
    #[serde(rename = "stringType")]
    InlineText,
}

impl ContentKind {
    /// Nombre estable usado en serialización y en los selectores de la UI.
    pub fn as_wire(&self) -> &'static str {
        match self {
            ContentKind::File => "fileType",
            ContentKind::Uri => "uriType",
            ContentKind::InlineText => "stringType",
        }
    }

    /// Resuelve un nombre de wire al tipo correspondiente.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el nombre no es reconocido.
    pub fn by_name(name: &str) -> Result<Self, DomainError> {
        match name {
            "fileType" => Ok(ContentKind::File),
            "uriType" => Ok(ContentKind::Uri),
            "stringType" => Ok(ContentKind::InlineText),
            other => Err(DomainError::ValidationError(format!("unknown content kind: {other}"))),
        }
    }
}

/// El formulario arranca siempre en modo archivo.
impl Default for ContentKind {
    fn default() -> Self {
        ContentKind::File
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in [ContentKind::File, ContentKind::Uri, ContentKind::InlineText] {
            assert_eq!(ContentKind::by_name(kind.as_wire()).ok(), Some(kind));
        }
    }

    #[test]
    fn unknown_wire_name_is_rejected() {
        assert!(ContentKind::by_name("blobType").is_err());
    }
}
