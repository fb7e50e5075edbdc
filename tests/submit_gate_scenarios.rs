use form_adapters::{AdapterError, FormController, RecordingSurface, SurfaceOp};
use form_core::{build_form_profile, FormEngine, FormEngineError, FormProfile, InMemoryEventStore,
                InMemoryFormRepository};
use form_domain::{ArtifactPolicy, CombinationMode, DomainError, ValidationTypeOption};
use form_policies::{Blocker, DefaultSubmitPolicy};

type Controller = FormController<InMemoryEventStore, InMemoryFormRepository, RecordingSurface>;

fn controller_with(profile: FormProfile) -> Controller {
    let engine = FormEngine::new().profile(profile).build();
    FormController::new(engine, Box::new(DefaultSubmitPolicy::new()), RecordingSurface::new())
}

fn single_required() -> FormProfile {
    build_form_profile(vec![ValidationTypeOption::new("json (required)", ArtifactPolicy::Required)],
                       "URI del artefacto externo",
                       CombinationMode::AllOf)
}

fn two_options() -> FormProfile {
    build_form_profile(vec![ValidationTypeOption::new("contract", ArtifactPolicy::Optional),
                            ValidationTypeOption::new("freeform", ArtifactPolicy::None)],
                       "URI del artefacto externo",
                       CombinationMode::AllOf)
}

#[test]
fn single_required_option_selects_itself_and_gates_submit() {
    let mut ctl = controller_with(single_required());
    ctl.start().expect("start");

    // 1. La opción única quedó seleccionada y su fila mínima insertada
    let view = ctl.view().expect("vista");
    assert_eq!(view.validation_type.as_deref(), Some("json (required)"));
    assert_eq!(ctl.surface().inserted_rows(), vec![1]);
    assert_eq!(ctl.surface().last_submit_state(), Some(false));

    // 2. La única fila required no puede darse de baja
    let err = ctl.on_row_removed(1).unwrap_err();
    assert!(matches!(err,
                     AdapterError::Engine(FormEngineError::Domain(DomainError::InvalidOperation(_)))));

    // 3. Archivo más artefacto habilitan el envío
    ctl.on_file_selected("invoice.json").expect("archivo");
    ctl.on_row_value_changed(1, "https://example.org/base.schema.json").expect("valor");
    assert_eq!(ctl.surface().last_submit_state(), Some(true));
}

#[test]
fn optional_type_submits_with_primary_alone() {
    let mut ctl = controller_with(two_options());
    ctl.start().expect("start");
    ctl.on_validation_type_changed(Some("contract".into())).expect("seleccionar");

    // Optional: sin artefactos alcanza con la entrada principal
    ctl.on_file_selected("invoice.json").expect("archivo");
    assert_eq!(ctl.surface().last_submit_state(), Some(true));

    // El checkbox de inclusión sólo cambia visibilidad, nunca la decisión
    ctl.surface_mut().clear();
    ctl.on_include_toggled().expect("mostrar sección");
    assert!(ctl.surface().ops.contains(&SurfaceOp::SetSectionVisible(true)));
    assert_eq!(ctl.surface().last_submit_state(), Some(true));
}

#[test]
fn empty_selection_value_counts_as_unselected() {
    let mut ctl = controller_with(two_options());
    ctl.start().expect("start");
    ctl.on_file_selected("invoice.json").expect("archivo");

    // Una cadena vacía en el selector no es una selección
    ctl.on_validation_type_changed(Some(String::new())).expect("selección vacía");
    assert_eq!(ctl.surface().last_submit_state(), Some(false));
    let decision = ctl.decision().expect("decisión");
    assert!(decision.rationale.blockers.contains(&Blocker::ValidationTypeMissing));
}

#[test]
fn changing_selection_resets_rows_in_surface_and_state() {
    let mut ctl = controller_with(two_options());
    ctl.start().expect("start");
    ctl.on_validation_type_changed(Some("contract".into())).expect("seleccionar");
    ctl.on_file_selected("invoice.json").expect("archivo");

    let row = ctl.on_row_added().expect("alta");
    ctl.on_row_value_changed(row, "https://example.org/a.json").expect("valor");
    assert_eq!(ctl.surface().last_submit_state(), Some(true));

    // Cambiar el tipo limpia las filas en la superficie y en el estado
    ctl.surface_mut().clear();
    ctl.on_validation_type_changed(Some("freeform".into())).expect("cambiar tipo");
    assert_eq!(ctl.surface().removed_rows(), vec![row]);
    let view = ctl.view().expect("vista");
    assert!(view.rows.is_empty());
    // freeform sigue permitiendo enviar con el archivo ya elegido
    assert_eq!(ctl.surface().last_submit_state(), Some(true));
}
