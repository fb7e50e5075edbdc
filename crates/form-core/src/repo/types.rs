//! Tipos de repositorio: estado reconstruido (FormInstance) y definición
//! (FormProfile).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza la `FormInstance` evento a evento. El fold es mecánico, un brazo
//! por kind, sin decisiones de política; toda validación ocurrió en el motor
//! antes de emitir cada evento.
use uuid::Uuid;

use crate::event::{FormEvent, FormEventKind};
use crate::hashing::{hash_str, to_canonical_json};
use form_domain::{resolve_policy, ArtifactPolicy, CombinationMode, ContentKind, ExternalArtifactCollection,
                  ValidationTypeOption};

/// Definición inmutable de un formulario: las opciones del selector de tipo
/// de validación, el placeholder de las filas de artefactos y el modo de
/// combinación por defecto. El `profile_hash` identifica la definición.
#[derive(Debug, Clone)]
pub struct FormProfile {
    pub options: Vec<ValidationTypeOption>,
    pub artifact_placeholder: String,
    pub default_combination: CombinationMode,
    pub profile_hash: String,
}

impl FormProfile {
    /// Cantidad de opciones del selector.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Política de artefactos externos vigente para una selección dada.
    pub fn policy_for(&self, selected: Option<&str>) -> ArtifactPolicy {
        resolve_policy(selected, &self.options)
    }
}

/// Estado reconstruido de un formulario.
pub struct FormInstance {
    pub id: Uuid,
    pub validation_type: Option<String>,
    pub content_kind: ContentKind,
    /// Valores de la entrada principal, uno por kind. Se conservan aunque el
    /// kind activo cambie, igual que los inputs ocultos del formulario.
    pub file_name: String,
    pub uri: String,
    pub inline_text: String,
    pub artifacts: ExternalArtifactCollection,
    pub combination_mode: CombinationMode,
    pub include_external: bool,
    pub initialized: bool,
}

impl FormInstance {
    fn empty(form_id: Uuid, profile: &FormProfile) -> Self {
        FormInstance { id: form_id,
                       validation_type: None,
                       content_kind: ContentKind::default(),
                       file_name: String::new(),
                       uri: String::new(),
                       inline_text: String::new(),
                       artifacts: ExternalArtifactCollection::new(),
                       combination_mode: profile.default_combination,
                       include_external: false,
                       initialized: false }
    }

    /// Valor de la entrada principal para el kind activo.
    pub fn primary_value(&self) -> &str {
        match self.content_kind {
            ContentKind::File => &self.file_name,
            ContentKind::Uri => &self.uri,
            ContentKind::InlineText => &self.inline_text,
        }
    }

    /// Indica si la entrada principal activa tiene valor.
    pub fn primary_present(&self) -> bool {
        !self.primary_value().is_empty()
    }

    /// Política vigente según la selección actual y el perfil.
    pub fn policy(&self, profile: &FormProfile) -> ArtifactPolicy {
        profile.policy_for(self.validation_type.as_deref())
    }
}

/// Trait para reconstruir (`replay`) el estado de un formulario a partir de
/// eventos.
pub trait FormRepository {
    fn load(&self, form_id: Uuid, events: &[FormEvent], profile: &FormProfile) -> FormInstance;
}

pub struct InMemoryFormRepository;
impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryFormRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FormRepository for InMemoryFormRepository {
    fn load(&self, form_id: Uuid, events: &[FormEvent], profile: &FormProfile) -> FormInstance {
        let mut instance = FormInstance::empty(form_id, profile);
        for ev in events {
            match &ev.kind {
                FormEventKind::FormInitialized { .. } => instance.initialized = true,
                FormEventKind::ValidationTypeSelected { value } => {
                    instance.validation_type = value.clone();
                }
                FormEventKind::ContentKindChanged { kind } => instance.content_kind = *kind,
                FormEventKind::PrimaryValueChanged { kind, value } => match kind {
                    ContentKind::File => instance.file_name = value.clone(),
                    ContentKind::Uri => instance.uri = value.clone(),
                    ContentKind::InlineText => instance.inline_text = value.clone(),
                },
                FormEventKind::ArtifactRowAdded { row_id, .. } => {
                    // Un log bien formado no repite ids; un duplicado se ignora
                    let _ = instance.artifacts.restore(*row_id);
                }
                FormEventKind::ArtifactRowRemoved { row_id } => {
                    let _ = instance.artifacts.discard(*row_id);
                }
                FormEventKind::ArtifactRowKindChanged { row_id, kind } => {
                    let _ = instance.artifacts.set_kind(*row_id, *kind);
                }
                FormEventKind::ArtifactRowValueChanged { row_id, value } => {
                    let _ = instance.artifacts.set_value(*row_id, value.clone());
                }
                FormEventKind::ArtifactRowsReset { .. } => {
                    instance.artifacts.reset();
                }
                FormEventKind::CombinationModeChanged { mode, .. } => instance.combination_mode = *mode,
                FormEventKind::IncludeExternalToggled { include, .. } => instance.include_external = *include,
            }
        }
        instance
    }
}

/// Construye un `FormProfile` calculando su hash canónico a partir de las
/// opciones y los valores por defecto.
pub fn build_form_profile(options: Vec<ValidationTypeOption>,
                          artifact_placeholder: impl Into<String>,
                          default_combination: CombinationMode)
                          -> FormProfile {
    use serde_json::json;
    let artifact_placeholder = artifact_placeholder.into();
    let profile_json = json!({
        "options": options,
        "artifact_placeholder": artifact_placeholder,
        "default_combination": default_combination,
    });
    let profile_hash = hash_str(&to_canonical_json(&profile_json));
    FormProfile { options,
                  artifact_placeholder,
                  default_combination,
                  profile_hash }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use form_domain::ArtifactKind;

    fn profile() -> FormProfile {
        build_form_profile(vec![ValidationTypeOption::new("A", ArtifactPolicy::Optional),
                                ValidationTypeOption::new("B", ArtifactPolicy::Required)],
                           "schema",
                           CombinationMode::AllOf)
    }

    fn ev(form_id: Uuid, seq: u64, kind: FormEventKind) -> FormEvent {
        FormEvent { seq,
                    form_id,
                    kind,
                    ts: Utc::now() }
    }

    #[test]
    fn replay_rebuilds_rows_and_selection() {
        let profile = profile();
        let form_id = Uuid::new_v4();
        let events = vec![ev(form_id, 0, FormEventKind::FormInitialized { profile_hash: profile.profile_hash.clone(),
                                                                          option_count: 2 }),
                          ev(form_id, 1, FormEventKind::ValidationTypeSelected { value: Some("A".into()) }),
                          ev(form_id, 2, FormEventKind::ArtifactRowAdded { row_id: 1, forced: false }),
                          ev(form_id, 3, FormEventKind::ArtifactRowAdded { row_id: 2, forced: false }),
                          ev(form_id, 4, FormEventKind::ArtifactRowValueChanged { row_id: 2, value: "s.json".into() }),
                          ev(form_id, 5, FormEventKind::ArtifactRowRemoved { row_id: 1 })];

        let repo = InMemoryFormRepository::new();
        let instance = repo.load(form_id, &events, &profile);
        assert!(instance.initialized);
        assert_eq!(instance.validation_type.as_deref(), Some("A"));
        assert_eq!(instance.artifacts.ids(), vec![2]);
        assert!(instance.artifacts.any_row_with_value());
        // La marca de agua sobrevive al replay: el siguiente id sería 3
        assert_eq!(instance.artifacts.last_id(), 2);
    }

    #[test]
    fn replay_is_deterministic() {
        let profile = profile();
        let form_id = Uuid::new_v4();
        let events = vec![ev(form_id, 0, FormEventKind::FormInitialized { profile_hash: profile.profile_hash.clone(),
                                                                          option_count: 2 }),
                          ev(form_id, 1, FormEventKind::ContentKindChanged { kind: ContentKind::Uri }),
                          ev(form_id, 2, FormEventKind::PrimaryValueChanged { kind: ContentKind::Uri,
                                                                              value: "http://x/doc.json".into() }),
                          ev(form_id, 3, FormEventKind::ArtifactRowAdded { row_id: 1, forced: true }),
                          ev(form_id, 4, FormEventKind::ArtifactRowKindChanged { row_id: 1,
                                                                                 kind: ArtifactKind::Uri })];

        let repo = InMemoryFormRepository::new();
        let a = repo.load(form_id, &events, &profile);
        let b = repo.load(form_id, &events, &profile);
        assert_eq!(a.primary_value(), b.primary_value());
        assert_eq!(a.artifacts.content_hash(), b.artifacts.content_hash());
        assert_eq!(a.content_kind, b.content_kind);
    }

    #[test]
    fn primary_values_are_kept_per_kind() {
        let profile = profile();
        let form_id = Uuid::new_v4();
        let events = vec![ev(form_id, 0, FormEventKind::FormInitialized { profile_hash: profile.profile_hash.clone(),
                                                                          option_count: 2 }),
                          ev(form_id, 1, FormEventKind::PrimaryValueChanged { kind: ContentKind::File,
                                                                              value: "doc.json".into() }),
                          ev(form_id, 2, FormEventKind::ContentKindChanged { kind: ContentKind::Uri })];

        let repo = InMemoryFormRepository::new();
        let instance = repo.load(form_id, &events, &profile);
        // El valor de archivo sigue guardado aunque el kind activo sea URI
        assert!(!instance.primary_present());
        assert_eq!(instance.file_name, "doc.json");
    }
}
