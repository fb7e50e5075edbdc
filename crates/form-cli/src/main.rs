use form_core::{build_form_profile, FormEngine, FormEvent, FormProfile, InMemoryEventStore,
                InMemoryFormRepository};
use form_domain::{ArtifactPolicy, CombinationMode, ContentKind, ValidationTypeOption};
use form_policies::{DefaultSubmitPolicy, ReadinessParams, SubmitPolicy};
use uuid::Uuid;

/// Opciones de demostración cuando no hay FORMFLOW_VALIDATION_TYPES en el entorno.
fn builtin_options() -> Vec<ValidationTypeOption> {
    vec![ValidationTypeOption::new("schema", ArtifactPolicy::Required),
         ValidationTypeOption::new("contract", ArtifactPolicy::Optional),
         ValidationTypeOption::new("freeform", ArtifactPolicy::None)]
}

/// Perfil desde variables de entorno (.env ya cargado), con fallback integrado.
/// FORMFLOW_VALIDATION_TYPES es un array JSON de {label, value} con value en
/// none/optional/required.
fn profile_from_env() -> FormProfile {
    let options = match std::env::var("FORMFLOW_VALIDATION_TYPES") {
        Ok(raw) => match ValidationTypeOption::parse_list(&raw) {
            Ok(opts) if !opts.is_empty() => opts,
            Ok(_) => builtin_options(),
            Err(e) => {
                eprintln!("[form] FORMFLOW_VALIDATION_TYPES inválido: {e}");
                std::process::exit(3);
            }
        },
        Err(_) => builtin_options(),
    };
    let placeholder = std::env::var("FORMFLOW_ARTIFACT_PLACEHOLDER")
        .unwrap_or_else(|_| "URI del artefacto externo".to_string());
    let combination = match std::env::var("FORMFLOW_DEFAULT_COMBINATION") {
        Ok(name) => match CombinationMode::by_name(&name) {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("[form] FORMFLOW_DEFAULT_COMBINATION inválida: {e}");
                std::process::exit(3);
            }
        },
        Err(_) => CombinationMode::AllOf,
    };
    build_form_profile(options, placeholder, combination)
}

fn main() {
    // Cargar .env si existe para obtener el perfil del formulario
    let _ = dotenvy::dotenv();
    // CLI mínima: `form eval --select <LABEL> [--file <N>|--uri <U>|--text <T>] [--artifact <V>]... [--combine <MODE>]`
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "eval" {
        let mut select: Option<String> = None;
        let mut file: Option<String> = None;
        let mut uri: Option<String> = None;
        let mut text: Option<String> = None;
        let mut artifacts: Vec<String> = Vec::new();
        let mut combine: Option<String> = None;
        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--select" => { i += 1; if i < args.len() { select = Some(args[i].clone()); } }
                "--file" => { i += 1; if i < args.len() { file = Some(args[i].clone()); } }
                "--uri" => { i += 1; if i < args.len() { uri = Some(args[i].clone()); } }
                "--text" => { i += 1; if i < args.len() { text = Some(args[i].clone()); } }
                "--artifact" => { i += 1; if i < args.len() { artifacts.push(args[i].clone()); } }
                "--combine" => { i += 1; if i < args.len() { combine = Some(args[i].clone()); } }
                _ => {}
            }
            i += 1;
        }

        let primaries = [file.as_ref().map(|v| (ContentKind::File, v)),
                         uri.as_ref().map(|v| (ContentKind::Uri, v)),
                         text.as_ref().map(|v| (ContentKind::InlineText, v))];
        let mut primaries: Vec<_> = primaries.into_iter().flatten().collect();
        if primaries.len() > 1 {
            eprintln!("Uso: form eval admite sólo uno de --file / --uri / --text");
            std::process::exit(2);
        }

        let profile = profile_from_env();
        let mut engine = FormEngine::new().profile(profile).build();
        if let Err(e) = engine.initialize() {
            eprintln!("[form eval] error: {e}");
            std::process::exit(5);
        }
        if select.is_some() {
            if let Err(e) = engine.select_validation_type(select.clone()) {
                eprintln!("[form eval] error: {e}");
                std::process::exit(5);
            }
        }
        if let Some((kind, value)) = primaries.pop() {
            let applied = engine.change_content_kind(kind)
                                .and_then(|_| engine.set_primary_value(kind, value.as_str()));
            if let Err(e) = applied {
                eprintln!("[form eval] error: {e}");
                std::process::exit(5);
            }
        }
        // Cada --artifact llena la primera fila vacía o agrega una nueva
        for value in &artifacts {
            let empty_row = match engine.instance() {
                Ok(inst) => inst.artifacts.rows().find(|r| !r.has_value()).map(|r| r.id()),
                Err(e) => { eprintln!("[form eval] error: {e}"); std::process::exit(5); }
            };
            let row_id = match empty_row {
                Some(id) => id,
                None => match engine.add_artifact_row() {
                    Ok(id) => id,
                    Err(e) => { eprintln!("[form eval] error: {e}"); std::process::exit(5); }
                },
            };
            if let Err(e) = engine.set_artifact_row_value(row_id, value.as_str()) {
                eprintln!("[form eval] error: {e}");
                std::process::exit(5);
            }
        }
        if let Some(name) = combine {
            let mode = match CombinationMode::by_name(&name) {
                Ok(m) => m,
                Err(e) => { eprintln!("[form eval] modo de combinación inválido: {e}"); std::process::exit(3); }
            };
            // Con menos de dos artefactos el motor rechaza el cambio de modo
            if let Err(e) = engine.set_combination_mode(mode) {
                eprintln!("[form eval] combinación rechazada: {e}");
                std::process::exit(4);
            }
        }

        let (profile, instance) = match (engine.current_profile(), engine.instance()) {
            (Ok(p), Ok(i)) => (p, i),
            (Err(e), _) | (_, Err(e)) => { eprintln!("[form eval] error: {e}"); std::process::exit(5); }
        };
        let decision = DefaultSubmitPolicy::new().evaluate(&instance, &profile, &ReadinessParams::default());
        match serde_json::to_string_pretty(&decision) {
            Ok(s) => println!("{s}"),
            Err(e) => { eprintln!("[form eval] error serializando decisión: {e}"); std::process::exit(5); }
        }
        if decision.submit_enabled {
            println!("habilitado: form={}", instance.id);
            std::process::exit(0);
        } else {
            eprintln!("bloqueado: {:?}", decision.rationale.blockers);
            std::process::exit(4);
        }
    } else if args.len() >= 2 && args[1] == "replay" {
        // `form replay --file <PATH> [--form <UUID>]`: reconstruye un formulario
        // desde su log serializado
        let mut path: Option<String> = None;
        let mut expected: Option<Uuid> = None;
        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--file" => { i += 1; if i < args.len() { path = Some(args[i].clone()); } }
                "--form" => { i += 1; if i < args.len() { expected = Uuid::parse_str(&args[i]).ok(); } }
                _ => {}
            }
            i += 1;
        }
        let path = match path {
            Some(p) => p,
            None => {
                eprintln!("Uso: form replay --file <PATH.json> [--form <UUID>]");
                std::process::exit(2);
            }
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(r) => r,
            Err(e) => { eprintln!("[form replay] error de lectura: {e}"); std::process::exit(5); }
        };
        let events: Vec<FormEvent> = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => { eprintln!("[form replay] JSON parse error: {e}"); std::process::exit(3); }
        };
        if events.is_empty() {
            eprintln!("[form replay] el log no tiene eventos");
            std::process::exit(4);
        }
        let form_id = events[0].form_id;
        if events.iter().any(|e| e.form_id != form_id) {
            eprintln!("[form replay] el log mezcla eventos de más de un formulario");
            std::process::exit(4);
        }
        if let Some(expected) = expected {
            if expected != form_id {
                eprintln!("[form replay] el log pertenece a {form_id}, no a {expected}");
                std::process::exit(4);
            }
        }
        let mut store = InMemoryEventStore::default();
        store.inner.insert(form_id, events);
        let mut engine: FormEngine<_, _> = FormEngine::new_with_stores(store, InMemoryFormRepository::new());
        engine.set_profile(profile_from_env());
        engine.set_default_form_id(form_id);
        let view = match engine.view() {
            Ok(v) => v,
            Err(e) => { eprintln!("[form replay] error: {e}"); std::process::exit(5); }
        };
        println!("form: {}", view.form_id);
        println!("tipo: {:?} entrada={} principal={:?}", view.validation_type, view.content_kind, view.primary_value);
        println!("política: {} filas={}", view.policy, view.rows.len());
        for row in &view.rows {
            println!("  fila {} [{}] {:?}", row.id, row.kind, row.value);
        }
        println!("combinación: visible={} modo={}", view.combination.visible, view.combination.effective_mode);
        println!("fingerprint: {}", view.fingerprint);
        let (profile, instance) = match (engine.current_profile(), engine.instance()) {
            (Ok(p), Ok(i)) => (p, i),
            (Err(e), _) | (_, Err(e)) => { eprintln!("[form replay] error: {e}"); std::process::exit(5); }
        };
        let decision = DefaultSubmitPolicy::new().evaluate(&instance, &profile, &ReadinessParams::default());
        println!("envío habilitado: {}", decision.submit_enabled);
        std::process::exit(0);
    } else if args.len() >= 2 && args[1] == "demo" {
        if let Err(e) = run_demo() {
            eprintln!("[form demo] {e}");
            std::process::exit(5);
        }
    } else {
        println!("form-cli: use 'demo', 'eval' or 'replay' subcommands");
    }
}

/// Sesión guiada sobre el perfil integrado: selección required, fila forzada,
/// valores, alta y baja de filas y reset forzado del modo de combinación.
fn run_demo() -> Result<(), String> {
    let profile = build_form_profile(builtin_options(), "URI del artefacto externo", CombinationMode::AllOf);
    let mut engine = FormEngine::new().profile(profile).build();
    let form_id = engine.initialize().map_err(|e| e.to_string())?;
    println!("form: {form_id}");

    engine.select_validation_type(Some("schema".into())).map_err(|e| e.to_string())?;
    println!("seleccionado 'schema' (required): la fila 1 se fuerza sola");

    engine.set_primary_value(ContentKind::File, "factura.json").map_err(|e| e.to_string())?;
    engine.set_artifact_row_value(1, "https://example.org/base.schema.json").map_err(|e| e.to_string())?;

    let second = engine.add_artifact_row().map_err(|e| e.to_string())?;
    engine.set_artifact_row_value(second, "https://example.org/extra.schema.json").map_err(|e| e.to_string())?;
    engine.set_combination_mode(CombinationMode::AnyOf).map_err(|e| e.to_string())?;
    let view = engine.view().map_err(|e| e.to_string())?;
    println!("dos filas: combinación visible={} modo={}", view.combination.visible, view.combination.effective_mode);

    engine.remove_artifact_row(second).map_err(|e| e.to_string())?;
    let view = engine.view().map_err(|e| e.to_string())?;
    println!("una fila: combinación visible={} modo efectivo={}", view.combination.visible, view.combination.effective_mode);

    if let Some(variants) = engine.event_variants() {
        println!("secuencia de eventos: {:?}", variants);
    }
    println!("fingerprint: {}", view.fingerprint);

    let profile = engine.current_profile().map_err(|e| e.to_string())?;
    let instance = engine.instance().map_err(|e| e.to_string())?;
    let decision = DefaultSubmitPolicy::new().evaluate(&instance, &profile, &ReadinessParams::default());
    println!("envío habilitado: {} (policy={} params_hash={})",
             decision.submit_enabled, decision.policy_id, decision.params_hash);
    Ok(())
}
