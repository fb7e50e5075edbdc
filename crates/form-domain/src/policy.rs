// policy.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Nivel de soporte de artefactos externos que declara un tipo de validación:
/// no se admiten, son opcionales o son obligatorios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactPolicy {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "optional")]
    Optional,
    #[serde(rename = "required")]
    Required,
}

impl ArtifactPolicy {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ArtifactPolicy::None => "none",
            ArtifactPolicy::Optional => "optional",
            ArtifactPolicy::Required => "required",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ArtifactPolicy::Required)
    }

    /// Indica si la sección de artefactos externos participa del formulario
    /// (opcional u obligatorio; `None` la excluye por completo).
    pub fn allows_artifacts(&self) -> bool {
        !matches!(self, ArtifactPolicy::None)
    }
}

impl Default for ArtifactPolicy {
    fn default() -> Self {
        ArtifactPolicy::None
    }
}

impl fmt::Display for ArtifactPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Entrada del selector de tipo de validación: etiqueta visible y la política
/// de artefactos externos que ese tipo declara.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationTypeOption {
    pub label: String,
    pub value: ArtifactPolicy,
}

impl ValidationTypeOption {
    pub fn new(label: impl Into<String>, value: ArtifactPolicy) -> Self {
        ValidationTypeOption { label: label.into(),
                               value }
    }

    /// Parsea la lista de opciones desde el array JSON con el que el entorno
    /// la provee: `[{"label":"schema","value":"required"}, ...]`.
    ///
    /// # Errores
    /// `DomainError::SerializationError` si el JSON no tiene esa forma.
    pub fn parse_list(raw: &str) -> Result<Vec<ValidationTypeOption>, DomainError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Resuelve la política de artefactos externos vigente para la selección
/// actual del formulario.
///
/// Reglas, en orden:
/// 1. Lista con una sola opción: esa opción gana, se haya seleccionado algo
///    o no (el selector ni siquiera se muestra en ese caso).
/// 2. En otro caso se recorre la lista en orden estable y gana la primera
///    opción cuya etiqueta coincide exactamente con la selección.
/// 3. Sin coincidencia, o sin selección: `ArtifactPolicy::None`.
///
/// Consulta pura: no modifica nada y dos llamadas con los mismos argumentos
/// devuelven siempre el mismo resultado.
pub fn resolve_policy(selected: Option<&str>, options: &[ValidationTypeOption]) -> ArtifactPolicy {
    if options.len() == 1 {
        return options[0].value;
    }
    let Some(selected) = selected else {
        return ArtifactPolicy::None;
    };
    options.iter()
           .find(|opt| opt.label == selected)
           .map(|opt| opt.value)
           .unwrap_or(ArtifactPolicy::None)
}
