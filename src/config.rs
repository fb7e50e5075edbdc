//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//! También provee `load_profile` para construir el perfil inmutable del
//! formulario que consumen el motor y las validaciones del binario.
use once_cell::sync::Lazy;
use std::env;

use form_core::{build_form_profile, FormProfile};
use form_domain::{ArtifactPolicy, CombinationMode, ValidationTypeOption};

/// Configuración global de la aplicación (extensible para más secciones: logging, etc.).
pub struct AppConfig {
    /// Configuración específica del formulario de carga.
    pub form: FormConfig,
}

/// Parámetros del formulario de carga.
pub struct FormConfig {
    /// Opciones del selector de tipo de validación, cada una con su política
    /// de artefactos externos.
    pub validation_types: Vec<ValidationTypeOption>,
    /// Placeholder de los campos de las filas de artefacto externo.
    pub artifact_placeholder: String,
    /// Modo de combinación por defecto (y el efectivo con una sola fila).
    pub default_combination: CombinationMode,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let validation_types = match env::var("FORMFLOW_VALIDATION_TYPES") {
        Ok(raw) => ValidationTypeOption::parse_list(&raw).expect("FORMFLOW_VALIDATION_TYPES invalid"),
        Err(_) => default_validation_types(),
    };
    let artifact_placeholder = env::var("FORMFLOW_ARTIFACT_PLACEHOLDER")
        .unwrap_or_else(|_| "URI del artefacto externo".to_string());
    let default_combination = env::var("FORMFLOW_DEFAULT_COMBINATION").ok()
        .map(|v| CombinationMode::by_name(&v).expect("FORMFLOW_DEFAULT_COMBINATION invalid"))
        .unwrap_or(CombinationMode::AllOf);
    AppConfig {
        form: FormConfig { validation_types, artifact_placeholder, default_combination },
    }
});

/// Opciones usadas cuando el entorno no define FORMFLOW_VALIDATION_TYPES.
/// El array JSON esperado tiene la forma `[{"label":"schema","value":"required"}, ...]`.
fn default_validation_types() -> Vec<ValidationTypeOption> {
    vec![
        ValidationTypeOption::new("schema", ArtifactPolicy::Required),
        ValidationTypeOption::new("contract", ArtifactPolicy::Optional),
        ValidationTypeOption::new("freeform", ArtifactPolicy::None),
    ]
}

/// Construye el perfil del formulario a partir de la configuración cargada.
/// El hash del perfil queda fijado acá; el motor lo arrastra en el evento de
/// inicialización y en los fingerprints de vista.
pub fn load_profile() -> FormProfile {
    build_form_profile(CONFIG.form.validation_types.clone(),
                       CONFIG.form.artifact_placeholder.clone(),
                       CONFIG.form.default_combination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_cover_the_three_policies() {
        let options = default_validation_types();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, ArtifactPolicy::Required);
        assert_eq!(options[1].value, ArtifactPolicy::Optional);
        assert_eq!(options[2].value, ArtifactPolicy::None);
    }
}
