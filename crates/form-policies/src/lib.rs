//! form-policies – UF4: Política de habilitación de envío
//!
//! Provee el contrato y la implementación por defecto para decidir de manera
//! determinista y auditable si el botón de envío del formulario debe estar
//! habilitado. La decisión se recalcula completa sobre el estado
//! reconstruido; nunca se parchea el resultado anterior.

use form_core::hashing::{hash_str, to_canonical_json};
use form_core::repo::{FormInstance, FormProfile};
use form_domain::ArtifactPolicy;
use serde::{Deserialize, Serialize};

/// Parámetros de evaluación soportados.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessParams {
    /// Un perfil sin opciones no renderiza selector; con `true` esa ausencia
    /// cuenta como satisfecha en lugar de bloquear el envío.
    pub missing_selector_satisfies: bool,
}

impl Default for ReadinessParams {
    fn default() -> Self {
        Self { missing_selector_satisfies: true }
    }
}

/// Chequeo que impide el envío.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Blocker {
    /// La entrada principal activa no tiene valor.
    PrimaryMissing,
    /// Hay selector de tipo de validación y nada seleccionado.
    ValidationTypeMissing,
    /// La política `Required` exige al menos una fila con valor.
    ExternalArtifactMissing,
}

/// Decisión de habilitación de envío.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessDecision {
    pub submit_enabled: bool,
    /// id estático de la política que tomó la decisión.
    pub policy_id: String,
    /// Hash canónico de parámetros de la política.
    pub params_hash: String,
    /// Rationale tipado (serializable a JSON canónico para auditoría).
    pub rationale: ReadinessRationale,
}

/// Explicación tipada de la decisión.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessRationale {
    pub policy_id: String,
    pub params: ReadinessParams,
    pub primary_present: bool,
    pub validation_type_present: bool,
    pub external_policy: ArtifactPolicy,
    pub external_required: bool,
    pub external_satisfied: bool,
    pub considered_rows: usize,
    /// Réplica del chequeo del servidor (None => 0 filas, Required => al
    /// menos 1). Diagnóstico: nunca bloquea el envío del lado del cliente.
    pub artifact_count_consistent: bool,
    pub blockers: Vec<Blocker>,
}

impl ReadinessRationale {
    /// JSON canónico para persistencia/auditoría.
    pub fn to_canonical_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("serialize rationale")
    }
}

/// Contrato de políticas de habilitación deterministas.
pub trait SubmitPolicy {
    fn id(&self) -> &'static str;
    fn evaluate(&self, instance: &FormInstance, profile: &FormProfile, params: &ReadinessParams) -> ReadinessDecision;
}

/// Política por defecto: entrada principal con valor, tipo de validación
/// resuelto y, bajo política `Required`, al menos un artefacto con valor.
pub struct DefaultSubmitPolicy;

impl DefaultSubmitPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultSubmitPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitPolicy for DefaultSubmitPolicy {
    fn id(&self) -> &'static str {
        "submit_gate"
    }

    fn evaluate(&self, instance: &FormInstance, profile: &FormProfile, params: &ReadinessParams) -> ReadinessDecision {
        let primary_present = instance.primary_present();

        // Selección vacía cuenta como no seleccionada, igual que el value
        // vacío del placeholder del selector
        let selected = matches!(instance.validation_type.as_deref(), Some(v) if !v.is_empty());
        let validation_type_present = selected || (profile.is_empty() && params.missing_selector_satisfies);

        let external_policy = instance.policy(profile);
        let external_required = external_policy.is_required();
        let external_satisfied = !external_required || instance.artifacts.any_row_with_value();

        let considered_rows = instance.artifacts.len();
        let artifact_count_consistent = match external_policy {
            ArtifactPolicy::None => considered_rows == 0,
            ArtifactPolicy::Required => considered_rows >= 1,
            ArtifactPolicy::Optional => true,
        };

        let mut blockers = Vec::new();
        if !primary_present {
            blockers.push(Blocker::PrimaryMissing);
        }
        if !validation_type_present {
            blockers.push(Blocker::ValidationTypeMissing);
        }
        if !external_satisfied {
            blockers.push(Blocker::ExternalArtifactMissing);
        }
        let submit_enabled = blockers.is_empty();

        let params_hash = params_hash(params);
        let rationale = ReadinessRationale { policy_id: self.id().into(),
                                             params: params.clone(),
                                             primary_present,
                                             validation_type_present,
                                             external_policy,
                                             external_required,
                                             external_satisfied,
                                             considered_rows,
                                             artifact_count_consistent,
                                             blockers };
        ReadinessDecision { submit_enabled,
                            policy_id: self.id().into(),
                            params_hash,
                            rationale }
    }
}

/// Hash canónico de parámetros.
pub fn params_hash(params: &ReadinessParams) -> String {
    let v = serde_json::to_value(params).expect("params serialize");
    let cj = to_canonical_json(&v);
    hash_str(&cj)
}
