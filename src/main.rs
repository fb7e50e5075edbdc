/// Validación UF1: altas y bajas de filas, ids monotónicos y watermark.
fn run_uf1_validation() {
    use form_core::FormEngine;

    let mut engine = FormEngine::new().profile(demo_profile()).build();
    engine.initialize().expect("UF1: inicializar");
    engine.select_validation_type(Some("contract".into())).expect("UF1: seleccionar contract");

    let a = engine.add_artifact_row().expect("UF1: alta fila");
    let b = engine.add_artifact_row().expect("UF1: alta fila");
    let c = engine.add_artifact_row().expect("UF1: alta fila");
    assert_eq!((a, b, c), (1, 2, 3), "UF1: ids consecutivos desde 1");

    engine.remove_artifact_row(b).expect("UF1: baja fila");
    let view = engine.view().expect("UF1: vista");
    let ids: Vec<u32> = view.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3], "UF1: la baja no renumera");

    let d = engine.add_artifact_row().expect("UF1: alta fila");
    assert_eq!(d, 4, "UF1: un id dado de baja nunca se reusa");

    println!("!Validación UF1: OK (ids monotónicos, baja sin renumerar)");
}

use form_adapters::{FormController, PlainEditor, RecordingSurface, SurfaceOp, INLINE_EDITOR};
use form_core::{build_form_profile, FormEngine, FormProfile, InMemoryEventStore, InMemoryFormRepository};
use form_domain::{ArtifactPolicy, CombinationMode, ContentKind, ValidationTypeOption};
use form_policies::{DefaultSubmitPolicy, ReadinessParams, SubmitPolicy};
use formflow_rust::config;
use serde_json::to_string_pretty;
use uuid::Uuid;

/// Perfil local de tres opciones para las validaciones (independiente del
/// entorno; `config::load_profile` se muestra aparte en `main`).
fn demo_profile() -> FormProfile {
    build_form_profile(vec![ValidationTypeOption::new("schema", ArtifactPolicy::Required),
                            ValidationTypeOption::new("contract", ArtifactPolicy::Optional),
                            ValidationTypeOption::new("freeform", ArtifactPolicy::None)],
                       "URI del artefacto externo",
                       CombinationMode::AllOf)
}

fn main() {
    // Cargar variables de entorno desde .env si existe (antes de leer FORMFLOW_*)
    let _ = dotenvy::dotenv();

    // Perfil según entorno, con valores por defecto integrados
    let profile = config::load_profile();
    println!("perfil cargado: {} opciones, hash={}", profile.len(), profile.profile_hash);

    println!("--- Iniciando validación UF1 ---");
    run_uf1_validation();

    println!("--- Iniciando validación UF2 ---");
    run_uf2_validation();

    println!("--- Iniciando validación UF3 ---");
    run_uf3_validation();

    println!("--- Iniciando validación UF4 ---");
    if let Err(e) = run_uf4_validation() {
        eprintln!("[UF4] Error: {e}");
    } else {
        println!("[UF4] Validación OK");
    }

    println!("--- Iniciando validación UF5 ---");
    run_uf5_validation();

    println!("--- Iniciando validación de aislamiento multi-form ---");
    run_isolation_validation();

    println!("--- Iniciando validación de determinismo ---");
    run_replay_validation();

    if std::env::var("FORMFLOW_DUMP_EVENTS").is_ok() {
        run_event_dump();
    } else {
        eprintln!("[DUMP] Skipping (set FORMFLOW_DUMP_EVENTS=1 to enable)");
    }
}

/// Validación UF2: resolución de política por selección, fila forzada bajo
/// `Required` y auto-selección del perfil de opción única.
fn run_uf2_validation() {
    let mut engine = FormEngine::new().profile(demo_profile()).build();
    engine.initialize().expect("UF2: inicializar");

    // Sin selección no hay política: la sección entera queda fuera
    let view = engine.view().expect("UF2: vista");
    assert_eq!(view.policy, ArtifactPolicy::None, "UF2: sin selección no hay artefactos");
    assert!(!view.section.section_visible);

    engine.select_validation_type(Some("schema".into())).expect("UF2: seleccionar schema");
    let view = engine.view().expect("UF2: vista");
    assert_eq!(view.policy, ArtifactPolicy::Required);
    assert_eq!(view.rows.len(), 1, "UF2: required fuerza la fila mínima");
    assert!(!view.rows[0].removable, "UF2: la única fila required no se puede quitar");
    assert!(view.section.section_visible && !view.section.include_toggle_visible);

    // Cambiar a un tipo sin artefactos limpia las filas
    engine.select_validation_type(Some("freeform".into())).expect("UF2: seleccionar freeform");
    let view = engine.view().expect("UF2: vista");
    assert!(view.rows.is_empty(), "UF2: el cambio de tipo limpia las filas");
    assert!(!view.section.section_visible);

    // Perfil de opción única: el selector ni se muestra y queda seleccionada
    let single = build_form_profile(vec![ValidationTypeOption::new("json (required)", ArtifactPolicy::Required)],
                                    "URI del artefacto externo",
                                    CombinationMode::AllOf);
    let mut engine = FormEngine::new().profile(single).build();
    engine.initialize().expect("UF2: inicializar opción única");
    let view = engine.view().expect("UF2: vista");
    assert_eq!(view.validation_type.as_deref(), Some("json (required)"));
    assert_eq!(view.rows.len(), 1, "UF2: la opción única required trae su fila");

    println!("!Validación UF2: OK (política por selección y auto-selección de opción única)");
}

/// Validación UF3: visibilidad del modo de combinación y reset forzado.
fn run_uf3_validation() {
    let mut engine = FormEngine::new().profile(demo_profile()).build();
    engine.initialize().expect("UF3: inicializar");
    engine.select_validation_type(Some("contract".into())).expect("UF3: seleccionar contract");

    let first = engine.add_artifact_row().expect("UF3: alta fila");
    let view = engine.view().expect("UF3: vista");
    assert!(!view.combination.visible, "UF3: con una fila el control sigue oculto");

    let second = engine.add_artifact_row().expect("UF3: alta fila");
    engine.set_combination_mode(CombinationMode::AnyOf).expect("UF3: cambiar modo");
    let view = engine.view().expect("UF3: vista");
    assert!(view.combination.visible, "UF3: con dos filas el control se muestra");
    assert_eq!(view.combination.effective_mode, CombinationMode::AnyOf);

    // Al volver a una fila el control se oculta y el modo vuelve al default
    engine.remove_artifact_row(second).expect("UF3: baja fila");
    let view = engine.view().expect("UF3: vista");
    assert!(!view.combination.visible);
    assert_eq!(view.combination.effective_mode, CombinationMode::AllOf);
    assert_eq!(view.rows[0].id, first, "UF3: queda la primera fila");
    let variants = engine.event_variants().expect("UF3: eventos");
    assert_eq!(variants.last(), Some(&"C"), "UF3: el reset forzado queda en el log");

    println!("!Validación UF3: OK (visibilidad >1 y reset forzado del modo)");
}

/// Validación UF4: la decisión de envío bloquea sin entrada principal y sin
/// artefacto bajo `Required`, y sus params_hash son estables.
fn run_uf4_validation() -> Result<(), String> {
    let mut engine = FormEngine::new().profile(demo_profile()).build();
    engine.initialize().map_err(|e| e.to_string())?;
    engine.select_validation_type(Some("schema".into())).map_err(|e| e.to_string())?;

    let policy = DefaultSubmitPolicy::new();
    let params = ReadinessParams::default();
    let profile = engine.current_profile().map_err(|e| e.to_string())?;

    let instance = engine.instance().map_err(|e| e.to_string())?;
    let d1 = policy.evaluate(&instance, &profile, &params);
    if d1.submit_enabled {
        return Err("UF4: no debe habilitar sin entrada principal".into());
    }

    engine.set_primary_value(ContentKind::File, "factura.json").map_err(|e| e.to_string())?;
    let instance = engine.instance().map_err(|e| e.to_string())?;
    let d2 = policy.evaluate(&instance, &profile, &params);
    if d2.submit_enabled {
        return Err("UF4: no debe habilitar con la fila forzada vacía".into());
    }

    engine.set_artifact_row_value(1, "https://example.org/base.schema.json").map_err(|e| e.to_string())?;
    let instance = engine.instance().map_err(|e| e.to_string())?;
    let d3 = policy.evaluate(&instance, &profile, &params);
    if !d3.submit_enabled {
        return Err("UF4: con archivo y artefacto debe habilitar".into());
    }
    if d1.params_hash != d3.params_hash {
        return Err("UF4: params_hash debe ser estable entre evaluaciones".into());
    }

    println!("[UF4] decisión: {}", to_string_pretty(&d3).map_err(|e| e.to_string())?);
    Ok(())
}

/// Validación UF5: controller sobre superficie grabadora y editor diferido.
fn run_uf5_validation() {
    let engine = FormEngine::new().profile(demo_profile()).build();
    let mut ctl = FormController::new(engine, Box::new(DefaultSubmitPolicy::new()), RecordingSurface::new());
    ctl.register_editor(INLINE_EDITOR, Box::new(PlainEditor::with_content("{\"ping\":1}")));

    ctl.start().expect("UF5: start");
    assert!(matches!(ctl.surface().ops.last(), Some(SurfaceOp::SetSubmitEnabled(false))),
            "UF5: la pasada cierra con el estado de envío");

    ctl.on_validation_type_changed(Some("contract".into())).expect("UF5: seleccionar");
    ctl.on_content_kind_changed(ContentKind::InlineText).expect("UF5: cambiar a texto");
    ctl.on_inline_text_edited().expect("UF5: editar");

    let view = ctl.view().expect("UF5: vista");
    assert_eq!(view.primary_value, "{\"ping\":1}", "UF5: el contenido del editor fluye al estado");
    assert_eq!(ctl.surface().last_submit_state(), Some(true), "UF5: contract más texto habilita");

    println!("!Validación UF5: OK (controller, editor diferido y envío habilitado)");
}

/// Validación de aislamiento: dos formularios sobre los mismos stores no se
/// pisan entre sí.
fn run_isolation_validation() {
    let profile = demo_profile();
    let mut engine: FormEngine<_, _> =
        FormEngine::new_with_stores(InMemoryEventStore::default(), InMemoryFormRepository::new());
    engine.set_profile(profile.clone());

    let id_a = Uuid::new_v4();
    let id_b = Uuid::new_v4();
    engine.initialize_for(id_a, &profile).expect("aislamiento: alta A");
    engine.initialize_for(id_b, &profile).expect("aislamiento: alta B");

    engine.select_validation_type_for(id_b, &profile, Some("schema".into())).expect("aislamiento: seleccionar en B");
    let view_a = engine.view_for(id_a, &profile).expect("aislamiento: vista A");
    let view_b = engine.view_for(id_b, &profile).expect("aislamiento: vista B");
    assert!(view_a.validation_type.is_none(), "aislamiento: A no ve la selección de B");
    assert_eq!(view_b.rows.len(), 1, "aislamiento: la fila forzada es sólo de B");
    assert!(view_a.rows.is_empty());

    println!("!Validación de aislamiento: OK (eventos por form_id)");
}

/// Validación de determinismo: la misma sesión produce el mismo fingerprint
/// y el fold de su log lo reproduce.
fn run_replay_validation() {
    fn scripted(engine: &mut FormEngine<InMemoryEventStore, InMemoryFormRepository>) {
        engine.initialize().expect("determinismo: inicializar");
        engine.select_validation_type(Some("schema".into())).expect("determinismo: seleccionar");
        engine.set_primary_value(ContentKind::File, "factura.json").expect("determinismo: archivo");
        engine.set_artifact_row_value(1, "https://example.org/base.schema.json").expect("determinismo: valor");
        let second = engine.add_artifact_row().expect("determinismo: alta");
        engine.set_artifact_row_value(second, "https://example.org/extra.schema.json").expect("determinismo: valor");
        engine.set_combination_mode(CombinationMode::OneOf).expect("determinismo: modo");
    }

    let mut a = FormEngine::new().profile(demo_profile()).build();
    let mut b = FormEngine::new().profile(demo_profile()).build();
    scripted(&mut a);
    scripted(&mut b);

    let fp_a = a.view().expect("determinismo: vista").fingerprint;
    let fp_b = b.view().expect("determinismo: vista").fingerprint;
    assert_eq!(fp_a, fp_b, "determinismo: misma sesión, mismo fingerprint");

    // Fold del log en stores nuevos: mismo estado, mismo fingerprint
    let events = a.events().expect("determinismo: eventos");
    let form_id = a.default_form_id().expect("determinismo: form id");
    let mut store = InMemoryEventStore::default();
    store.inner.insert(form_id, events);
    let mut replayed: FormEngine<_, _> = FormEngine::new_with_stores(store, InMemoryFormRepository::new());
    replayed.set_profile(demo_profile());
    replayed.set_default_form_id(form_id);
    let fp_c = replayed.view().expect("determinismo: vista replay").fingerprint;
    assert_eq!(fp_c, fp_a, "determinismo: el fold del log reproduce la vista");

    println!("Fingerprint estable tras replay: {}", fp_a);
    println!("!Validación de determinismo: OK");
}

/// Volcado del log de una sesión corta (habilitado por FORMFLOW_DUMP_EVENTS).
fn run_event_dump() {
    let mut engine = FormEngine::new().profile(demo_profile()).build();
    engine.initialize().expect("dump: inicializar");
    engine.select_validation_type(Some("schema".into())).expect("dump: seleccionar");
    engine.change_content_kind(ContentKind::Uri).expect("dump: cambiar a uri");
    engine.set_primary_value(ContentKind::Uri, "https://example.org/factura.json").expect("dump: uri");
    engine.set_artifact_row_value(1, "https://example.org/base.schema.json").expect("dump: valor");

    if let Some(events) = engine.events() {
        for e in &events {
            println!("[DUMP] seq={} ts={} {:?}", e.seq, e.ts, e.kind);
        }
    }
    if let Some(variants) = engine.event_variants() {
        println!("[DUMP] secuencia: {:?}", variants);
    }
}
