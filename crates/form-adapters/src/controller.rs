//! Controller: despacho de acciones y render completo.
//!
//! Cada handler sigue el mismo ciclo: despachar la acción al motor, derivar
//! la vista y la decisión de envío desde cero y volcarlas enteras sobre la
//! superficie. No se parchea nada incremental; la única estructura retenida
//! es el conjunto de ids de fila ya insertados, que se reconcilia por id.
//! La pasada de render cierra siempre con el estado del botón de envío y
//! recién después se drenan los refrescos de editor diferidos.

use log::debug;
use serde_json::json;

use form_core::derive::FormView;
use form_core::event::EventStore;
use form_core::repo::FormRepository;
use form_core::FormEngine;
use form_domain::{ArtifactKind, CombinationMode, ContentKind};
use form_policies::{ReadinessDecision, ReadinessParams, SubmitPolicy};

use crate::editor::{AdapterError, DeferredRefresh, EditorRegistry, EditorWidget};
use crate::surface::FormSurface;

/// Id del widget de editor de texto en línea que el host debe registrar.
pub const INLINE_EDITOR: &str = "text-editor";

/// Adaptador delgado entre el motor de formularios y una superficie de UI.
pub struct FormController<E, R, S>
    where E: EventStore,
          R: FormRepository,
          S: FormSurface
{
    engine: FormEngine<E, R>,
    policy: Box<dyn SubmitPolicy>,
    params: ReadinessParams,
    surface: S,
    editors: EditorRegistry,
    refresh_queue: DeferredRefresh,
    rendered_rows: Vec<u32>,
}

impl<E, R, S> FormController<E, R, S>
    where E: EventStore,
          R: FormRepository,
          S: FormSurface
{
    pub fn new(engine: FormEngine<E, R>, policy: Box<dyn SubmitPolicy>, surface: S) -> Self {
        Self { engine,
               policy,
               params: ReadinessParams::default(),
               surface,
               editors: EditorRegistry::new(),
               refresh_queue: DeferredRefresh::new(),
               rendered_rows: Vec::new() }
    }

    /// Reemplaza los parámetros de evaluación de envío.
    pub fn with_params(mut self, params: ReadinessParams) -> Self {
        self.params = params;
        self
    }

    /// Registra un widget de editor bajo un id de elemento.
    pub fn register_editor(&mut self, id: impl Into<String>, editor: Box<dyn EditorWidget>) {
        self.editors.register(id, editor);
    }

    /// Acceso de sólo lectura a la superficie (tests).
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Acceso mutable a la superficie, p.ej. para limpiar una grabadora
    /// entre pasadas.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Acceso a un editor registrado.
    pub fn editor(&self, id: &str) -> Result<&dyn EditorWidget, AdapterError> {
        self.editors.get(id)
    }

    /// Da de alta el formulario y hace la primera pasada de render.
    pub fn start(&mut self) -> Result<(), AdapterError> {
        self.engine.initialize()?;
        self.render()
    }

    pub fn on_validation_type_changed(&mut self, value: Option<String>) -> Result<(), AdapterError> {
        self.engine.select_validation_type(value)?;
        self.render()
    }

    /// Cambio del tipo de entrada principal. Pasar a texto en línea agenda
    /// el refresco diferido del editor.
    pub fn on_content_kind_changed(&mut self, kind: ContentKind) -> Result<(), AdapterError> {
        self.engine.change_content_kind(kind)?;
        if kind == ContentKind::InlineText {
            self.refresh_queue.schedule(INLINE_EDITOR);
        }
        self.render()
    }

    pub fn on_file_selected(&mut self, name: &str) -> Result<(), AdapterError> {
        self.engine.set_primary_value(ContentKind::File, name)?;
        self.render()
    }

    pub fn on_uri_changed(&mut self, uri: &str) -> Result<(), AdapterError> {
        self.engine.set_primary_value(ContentKind::Uri, uri)?;
        self.render()
    }

    /// Sincroniza el contenido actual del editor en línea hacia el estado.
    pub fn on_inline_text_edited(&mut self) -> Result<(), AdapterError> {
        let content = self.editors.get(INLINE_EDITOR)?.content();
        self.engine.set_primary_value(ContentKind::InlineText, content)?;
        self.render()
    }

    /// Alta de fila por el usuario; retorna el id asignado.
    pub fn on_row_added(&mut self) -> Result<u32, AdapterError> {
        let row_id = self.engine.add_artifact_row()?;
        self.render()?;
        Ok(row_id)
    }

    pub fn on_row_removed(&mut self, row_id: u32) -> Result<(), AdapterError> {
        self.engine.remove_artifact_row(row_id)?;
        self.render()
    }

    pub fn on_row_kind_changed(&mut self, row_id: u32, kind: ArtifactKind) -> Result<(), AdapterError> {
        self.engine.set_artifact_row_kind(row_id, kind)?;
        self.render()
    }

    pub fn on_row_value_changed(&mut self, row_id: u32, value: &str) -> Result<(), AdapterError> {
        self.engine.set_artifact_row_value(row_id, value)?;
        self.render()
    }

    pub fn on_combination_changed(&mut self, mode: CombinationMode) -> Result<(), AdapterError> {
        self.engine.set_combination_mode(mode)?;
        self.render()
    }

    pub fn on_include_toggled(&mut self) -> Result<(), AdapterError> {
        self.engine.toggle_include_external()?;
        self.render()
    }

    /// Vista derivada actual (replay completo).
    pub fn view(&mut self) -> Result<FormView, AdapterError> {
        Ok(self.engine.view()?)
    }

    /// Decisión de envío actual, evaluada desde cero sobre el estado.
    pub fn decision(&mut self) -> Result<ReadinessDecision, AdapterError> {
        let profile = self.engine.current_profile()?;
        let instance = self.engine.instance()?;
        Ok(self.policy.evaluate(&instance, &profile, &self.params))
    }

    fn render(&mut self) -> Result<(), AdapterError> {
        let view = self.engine.view()?;
        let decision = self.decision()?;
        let resumen = json!({ "form": view.form_id.to_string(),
                              "rows": view.rows.len(),
                              "policy": view.policy,
                              "submit": decision.submit_enabled });
        debug!("render pass {resumen}");

        self.surface.show_primary_input(view.content_kind);
        self.surface.set_include_toggle_visible(view.section.include_toggle_visible);
        self.surface.set_section_visible(view.section.section_visible);

        // Reconciliación por id: quitar filas que ya no están, insertar las
        // nuevas, refrescar todas
        let current: Vec<u32> = view.rows.iter().map(|r| r.id).collect();
        for stale in self.rendered_rows.iter().filter(|id| !current.contains(id)) {
            self.surface.remove_row(*stale);
        }
        for row in &view.rows {
            if !self.rendered_rows.contains(&row.id) {
                self.surface.insert_row(row.id, &view.artifact_placeholder);
            }
            self.surface.show_row_input(row.id, row.kind);
            self.surface.set_row_value(row.id, &row.value);
            self.surface.set_row_removable(row.id, row.removable);
        }
        self.rendered_rows = current;

        self.surface.set_combination_visible(view.combination.visible);
        self.surface.set_combination_mode(view.combination.effective_mode);

        // El botón de envío cierra la pasada
        self.surface.set_submit_enabled(decision.submit_enabled);

        // Los refrescos diferidos corren después de la pasada completa
        self.refresh_queue.drain(&mut self.editors)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};
    use form_core::repo::build_form_profile;
    use form_core::{FormEngine, InMemoryEventStore, InMemoryFormRepository};
    use form_domain::{ArtifactPolicy, ValidationTypeOption};
    use form_policies::DefaultSubmitPolicy;
    use std::cell::Cell;
    use std::rc::Rc;

    type Controller = FormController<InMemoryEventStore, InMemoryFormRepository, RecordingSurface>;

    fn controller(options: Vec<ValidationTypeOption>) -> Controller {
        let profile = build_form_profile(options, "schema", CombinationMode::AllOf);
        let engine = FormEngine::new().profile(profile).build();
        FormController::new(engine, Box::new(DefaultSubmitPolicy::new()), RecordingSurface::new())
    }

    fn abc_options() -> Vec<ValidationTypeOption> {
        vec![ValidationTypeOption::new("A", ArtifactPolicy::Optional),
             ValidationTypeOption::new("B", ArtifactPolicy::Required),
             ValidationTypeOption::new("C", ArtifactPolicy::None)]
    }

    struct SharedEditor {
        hits: Rc<Cell<u32>>,
        text: Rc<std::cell::RefCell<String>>,
    }

    impl EditorWidget for SharedEditor {
        fn content(&self) -> String {
            self.text.borrow().clone()
        }
        fn set_content(&mut self, text: &str) {
            *self.text.borrow_mut() = text.to_string();
        }
        fn refresh(&mut self) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn every_render_pass_ends_with_the_submit_state() {
        let mut ctl = controller(abc_options());
        ctl.start().expect("start");

        let ops = &ctl.surface().ops;
        assert!(!ops.is_empty());
        assert!(matches!(ops.last(), Some(SurfaceOp::SetSubmitEnabled(false))));
    }

    #[test]
    fn rows_are_reconciled_by_id() {
        let mut ctl = controller(abc_options());
        ctl.start().expect("start");
        ctl.on_validation_type_changed(Some("A".into())).expect("select");

        let first = ctl.on_row_added().expect("add");
        let second = ctl.on_row_added().expect("add");
        assert_eq!((first, second), (1, 2));

        ctl.surface_mut().clear();
        ctl.on_row_removed(first).expect("remove");
        assert_eq!(ctl.surface().removed_rows(), vec![1]);
        assert!(ctl.surface().inserted_rows().is_empty());

        ctl.surface_mut().clear();
        let third = ctl.on_row_added().expect("add");
        assert_eq!(third, 3);
        assert_eq!(ctl.surface().inserted_rows(), vec![3]);
    }

    #[test]
    fn required_profile_gates_submit_until_artifact_has_value() {
        let mut ctl = controller(vec![ValidationTypeOption::new("json", ArtifactPolicy::Required)]);
        ctl.start().expect("start");
        assert_eq!(ctl.surface().last_submit_state(), Some(false));

        ctl.on_file_selected("doc.json").expect("file");
        // La fila forzada existe pero sigue sin valor
        assert_eq!(ctl.surface().last_submit_state(), Some(false));

        ctl.on_row_value_changed(1, "schema.json").expect("value");
        assert_eq!(ctl.surface().last_submit_state(), Some(true));

        let decision = ctl.decision().expect("decision");
        assert!(decision.submit_enabled);
        assert!(decision.rationale.external_satisfied);
    }

    #[test]
    fn switching_to_inline_text_defers_exactly_one_refresh() {
        let hits = Rc::new(Cell::new(0));
        let text = Rc::new(std::cell::RefCell::new(String::from("{\"ok\":true}")));
        let mut ctl = controller(abc_options());
        ctl.register_editor(INLINE_EDITOR,
                            Box::new(SharedEditor { hits: Rc::clone(&hits),
                                                    text: Rc::clone(&text) }));
        ctl.start().expect("start");
        assert_eq!(hits.get(), 0);

        ctl.on_content_kind_changed(ContentKind::InlineText).expect("kind");
        assert_eq!(hits.get(), 1);

        // El contenido del editor fluye al estado al editarse
        ctl.on_inline_text_edited().expect("edited");
        let view = ctl.view().expect("view");
        assert_eq!(view.primary_value, "{\"ok\":true}");
        assert!(view.primary_present);
    }

    #[test]
    fn missing_inline_editor_surfaces_the_precondition() {
        let mut ctl = controller(abc_options());
        ctl.start().expect("start");
        let err = ctl.on_inline_text_edited().unwrap_err();
        assert!(matches!(err, AdapterError::WidgetNotFound(ref id) if id == INLINE_EDITOR));
    }

    #[test]
    fn optional_include_toggle_changes_visibility_not_submit() {
        let mut ctl = controller(abc_options());
        ctl.start().expect("start");
        ctl.on_validation_type_changed(Some("A".into())).expect("select");
        ctl.on_file_selected("doc.json").expect("file");
        assert_eq!(ctl.surface().last_submit_state(), Some(true));

        ctl.surface_mut().clear();
        ctl.on_include_toggled().expect("toggle");
        let ops = &ctl.surface().ops;
        assert!(ops.contains(&SurfaceOp::SetSectionVisible(true)));
        assert_eq!(ctl.surface().last_submit_state(), Some(true));

        ctl.on_include_toggled().expect("toggle");
        assert_eq!(ctl.surface().last_submit_state(), Some(true));
    }
}
