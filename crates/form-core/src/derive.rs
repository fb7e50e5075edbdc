//! Proyecciones derivadas del estado del formulario.
//!
//! Todo lo que la UI muestra se recalcula completo a partir de la
//! `FormInstance` y el `FormProfile` en cada vista; no hay parcheo
//! incremental de estado derivado. Las funciones de este módulo son puras:
//! mismos argumentos, misma proyección.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;
use crate::repo::{FormInstance, FormProfile};
use form_domain::{ArtifactKind, ArtifactPolicy, CombinationMode, ContentKind};

/// Estado del control de modo de combinación. Visible sólo con más de una
/// fila; mientras está oculto el modo efectivo es el del perfil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationState {
    pub visible: bool,
    pub effective_mode: CombinationMode,
    /// Indica que el modo guardado difiere del por defecto estando el
    /// control oculto; el motor emite el reset forzado correspondiente.
    pub reset_mode: bool,
}

pub fn combination_state(instance: &FormInstance, profile: &FormProfile) -> CombinationState {
    let visible = instance.artifacts.len() > 1;
    CombinationState { visible,
                       effective_mode: if visible {
                           instance.combination_mode
                       } else {
                           profile.default_combination
                       },
                       reset_mode: !visible && instance.combination_mode != profile.default_combination }
}

/// Visibilidad de la sección de artefactos externos según la política:
/// `None` la excluye, `Required` la muestra siempre, `Optional` la supedita
/// al checkbox de inclusión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionState {
    pub section_visible: bool,
    pub include_toggle_visible: bool,
}

pub fn section_state(policy: ArtifactPolicy, include_external: bool) -> SectionState {
    match policy {
        ArtifactPolicy::None => SectionState { section_visible: false,
                                               include_toggle_visible: false },
        ArtifactPolicy::Required => SectionState { section_visible: true,
                                                   include_toggle_visible: false },
        ArtifactPolicy::Optional => SectionState { section_visible: include_external,
                                                   include_toggle_visible: true },
    }
}

/// Fila proyectada para presentación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    pub id: u32,
    pub kind: ArtifactKind,
    pub value: String,
    pub has_value: bool,
    /// `false` únicamente para la fila única de una lista `Required`.
    pub removable: bool,
}

/// Instantánea derivada completa del formulario. Es lo único que la capa de
/// presentación consume; se reconstruye entera tras cada acción.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormView {
    pub form_id: Uuid,
    pub validation_type: Option<String>,
    pub content_kind: ContentKind,
    pub primary_value: String,
    pub primary_present: bool,
    pub policy: ArtifactPolicy,
    pub rows: Vec<RowView>,
    pub any_row_with_value: bool,
    pub combination: CombinationState,
    pub section: SectionState,
    pub include_external: bool,
    pub artifact_placeholder: String,
    /// Hash canónico de la vista; dos replays del mismo log producen el
    /// mismo fingerprint.
    pub fingerprint: String,
}

/// Deriva la vista completa a partir del estado reconstruido y el perfil.
pub fn derive_view(instance: &FormInstance, profile: &FormProfile) -> FormView {
    let policy = instance.policy(profile);
    let removable = instance.artifacts.can_remove(policy);
    let rows: Vec<RowView> = instance.artifacts
                                     .rows()
                                     .map(|row| RowView { id: row.id(),
                                                          kind: row.kind(),
                                                          value: row.value().to_string(),
                                                          has_value: row.has_value(),
                                                          removable })
                                     .collect();
    let combination = combination_state(instance, profile);
    let section = section_state(policy, instance.include_external);

    let fingerprint = view_fingerprint(instance, profile, policy, &rows, &combination, &section);

    FormView { form_id: instance.id,
               validation_type: instance.validation_type.clone(),
               content_kind: instance.content_kind,
               primary_value: instance.primary_value().to_string(),
               primary_present: instance.primary_present(),
               policy,
               rows,
               any_row_with_value: instance.artifacts.any_row_with_value(),
               combination,
               section,
               include_external: instance.include_external,
               artifact_placeholder: profile.artifact_placeholder.clone(),
               fingerprint }
}

fn view_fingerprint(instance: &FormInstance,
                    profile: &FormProfile,
                    policy: ArtifactPolicy,
                    rows: &[RowView],
                    combination: &CombinationState,
                    section: &SectionState)
                    -> String {
    let row_triples: Vec<serde_json::Value> = rows.iter()
                                                  .map(|r| json!([r.id, r.kind.as_wire(), r.value]))
                                                  .collect();
    let fp_json = json!({
        "engine_version": ENGINE_VERSION,
        "profile_hash": profile.profile_hash,
        "validation_type": instance.validation_type,
        "content_kind": instance.content_kind.as_wire(),
        "primary_value": instance.primary_value(),
        "policy": policy.as_wire(),
        "rows": row_triples,
        "combination_visible": combination.visible,
        "effective_mode": combination.effective_mode.as_wire(),
        "section_visible": section.section_visible,
        "include_toggle_visible": section.include_toggle_visible,
        "include_external": instance.include_external,
    });
    hash_value(&fp_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::build_form_profile;
    use form_domain::{ExternalArtifactCollection, ValidationTypeOption};

    fn profile() -> FormProfile {
        build_form_profile(vec![ValidationTypeOption::new("A", ArtifactPolicy::Optional),
                                ValidationTypeOption::new("B", ArtifactPolicy::Required)],
                           "schema",
                           CombinationMode::AllOf)
    }

    fn instance(profile: &FormProfile) -> FormInstance {
        FormInstance { id: Uuid::new_v4(),
                       validation_type: None,
                       content_kind: ContentKind::File,
                       file_name: String::new(),
                       uri: String::new(),
                       inline_text: String::new(),
                       artifacts: ExternalArtifactCollection::new(),
                       combination_mode: profile.default_combination,
                       include_external: false,
                       initialized: true }
    }

    #[test]
    fn combination_visible_only_above_one_row() {
        let profile = profile();
        let mut inst = instance(&profile);
        assert!(!combination_state(&inst, &profile).visible);

        inst.artifacts.add();
        assert!(!combination_state(&inst, &profile).visible);

        inst.artifacts.add();
        assert!(combination_state(&inst, &profile).visible);

        inst.artifacts.add();
        assert!(combination_state(&inst, &profile).visible);
    }

    #[test]
    fn hidden_control_reports_default_mode_and_reset() {
        let profile = profile();
        let mut inst = instance(&profile);
        inst.artifacts.add();
        inst.artifacts.add();
        inst.combination_mode = CombinationMode::AnyOf;

        let visible = combination_state(&inst, &profile);
        assert!(visible.visible);
        assert_eq!(visible.effective_mode, CombinationMode::AnyOf);
        assert!(!visible.reset_mode);

        // Al quedar una sola fila el control se oculta y pide el reset
        let removed = inst.artifacts
                          .remove(1, ArtifactPolicy::Optional)
                          .expect("removable");
        assert_eq!(removed.id(), 1);
        let hidden = combination_state(&inst, &profile);
        assert!(!hidden.visible);
        assert_eq!(hidden.effective_mode, CombinationMode::AllOf);
        assert!(hidden.reset_mode);
    }

    #[test]
    fn section_state_follows_policy() {
        let none = section_state(ArtifactPolicy::None, true);
        assert!(!none.section_visible && !none.include_toggle_visible);

        let required = section_state(ArtifactPolicy::Required, false);
        assert!(required.section_visible && !required.include_toggle_visible);

        let optional_off = section_state(ArtifactPolicy::Optional, false);
        assert!(!optional_off.section_visible && optional_off.include_toggle_visible);

        let optional_on = section_state(ArtifactPolicy::Optional, true);
        assert!(optional_on.section_visible && optional_on.include_toggle_visible);
    }

    #[test]
    fn sole_required_row_is_not_removable_in_view() {
        let profile = profile();
        let mut inst = instance(&profile);
        inst.validation_type = Some("B".into());
        inst.artifacts.add();

        let view = derive_view(&inst, &profile);
        assert_eq!(view.policy, ArtifactPolicy::Required);
        assert_eq!(view.rows.len(), 1);
        assert!(!view.rows[0].removable);

        inst.artifacts.add();
        let view = derive_view(&inst, &profile);
        assert!(view.rows.iter().all(|r| r.removable));
    }

    #[test]
    fn fingerprint_is_deterministic_and_sensitive() {
        let profile = profile();
        let mut inst = instance(&profile);
        inst.artifacts.add();

        let a = derive_view(&inst, &profile).fingerprint;
        let b = derive_view(&inst, &profile).fingerprint;
        assert_eq!(a, b);

        inst.artifacts.set_value(1, "s.json").expect("row exists");
        let c = derive_view(&inst, &profile).fingerprint;
        assert_ne!(a, c);
    }
}
