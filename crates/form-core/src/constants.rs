//! Constantes del motor de formularios.
//!
//! Valores estáticos que participan en el cálculo de fingerprints de las
//! vistas derivadas. Un cambio aquí invalida fingerprints previos aunque el
//! log de eventos no cambie (por diseño: el fingerprint ata la vista a la
//! versión del motor que la derivó).

/// Versión lógica del motor de formularios (UF1). Se incluye en el input del
/// fingerprint de vista para que un cambio de versión del motor se refleje
/// determinísticamente en los fingerprints. Mantener estable mientras no
/// haya cambios incompatibles en la derivación.
pub const ENGINE_VERSION: &str = "UF1.0";
