// combination.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Modo de combinación cuando se aportan varios artefactos externos: todos
/// deben cumplirse, al menos uno, o exactamente uno. Los nombres de wire son
/// los valores del selector original (`allOf`, `anyOf`, `oneOf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationMode {
    #[serde(rename = "allOf")]
    AllOf,
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "oneOf")]
    OneOf,
}

impl CombinationMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            CombinationMode::AllOf => "allOf",
            CombinationMode::AnyOf => "anyOf",
            CombinationMode::OneOf => "oneOf",
        }
    }

    /// Resuelve un nombre de wire al modo correspondiente.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el nombre no es un modo válido.
    pub fn by_name(name: &str) -> Result<Self, DomainError> {
        match name {
            "allOf" => Ok(CombinationMode::AllOf),
            "anyOf" => Ok(CombinationMode::AnyOf),
            "oneOf" => Ok(CombinationMode::OneOf),
            other => Err(DomainError::ValidationError(format!("unknown combination mode: {other}"))),
        }
    }
}

/// Valor al que vuelve el selector cuando el control deja de ser visible.
impl Default for CombinationMode {
    fn default() -> Self {
        CombinationMode::AllOf
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_accepts_the_three_modes() -> Result<(), DomainError> {
        assert_eq!(CombinationMode::by_name("allOf")?, CombinationMode::AllOf);
        assert_eq!(CombinationMode::by_name("anyOf")?, CombinationMode::AnyOf);
        assert_eq!(CombinationMode::by_name("oneOf")?, CombinationMode::OneOf);
        Ok(())
    }

    #[test]
    fn by_name_rejects_unknown_values() {
        assert!(CombinationMode::by_name("someOf").is_err());
        assert!(CombinationMode::by_name("").is_err());
    }

    #[test]
    fn default_is_all_of() {
        assert_eq!(CombinationMode::default(), CombinationMode::AllOf);
    }
}
