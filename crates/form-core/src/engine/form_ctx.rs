//! Form context implementation

use crate::derive::FormView;
use crate::engine::FormEngine;
use crate::errors::FormEngineError;
use crate::event::EventStore;
use crate::repo::{FormInstance, FormProfile, FormRepository};
use form_domain::{ArtifactKind, CombinationMode, ContentKind};
use uuid::Uuid;

/// Contexto de trabajo sobre un formulario específico
///
/// Proporciona una API ergonómica para despachar acciones y consultar vistas
/// de un formulario dentro de un FormEngine, sin repetir `form_id` y perfil
/// en cada llamada.
pub struct FormCtx<'a, E: EventStore, R: FormRepository> {
    pub engine: &'a mut FormEngine<E, R>,
    pub form_id: Uuid,
    pub profile: &'a FormProfile,
}

impl<'a, E: EventStore, R: FormRepository> FormCtx<'a, E, R> {
    /// Crea un nuevo contexto de formulario
    #[inline]
    pub fn new(engine: &'a mut FormEngine<E, R>, form_id: Uuid, profile: &'a FormProfile) -> Self {
        Self { engine,
               form_id,
               profile }
    }

    #[inline]
    pub fn initialize(&mut self) -> Result<(), FormEngineError> {
        self.engine.initialize_for(self.form_id, self.profile)
    }

    #[inline]
    pub fn select(&mut self, value: Option<String>) -> Result<(), FormEngineError> {
        self.engine.select_validation_type_for(self.form_id, self.profile, value)
    }

    #[inline]
    pub fn change_content_kind(&mut self, kind: ContentKind) -> Result<(), FormEngineError> {
        self.engine.change_content_kind_for(self.form_id, self.profile, kind)
    }

    #[inline]
    pub fn set_primary(&mut self, kind: ContentKind, value: impl Into<String>) -> Result<(), FormEngineError> {
        self.engine.set_primary_value_for(self.form_id, self.profile, kind, value)
    }

    #[inline]
    pub fn add_row(&mut self) -> Result<u32, FormEngineError> {
        self.engine.add_artifact_row_for(self.form_id, self.profile)
    }

    #[inline]
    pub fn remove_row(&mut self, row_id: u32) -> Result<(), FormEngineError> {
        self.engine.remove_artifact_row_for(self.form_id, self.profile, row_id)
    }

    #[inline]
    pub fn set_row_kind(&mut self, row_id: u32, kind: ArtifactKind) -> Result<(), FormEngineError> {
        self.engine.set_artifact_row_kind_for(self.form_id, self.profile, row_id, kind)
    }

    #[inline]
    pub fn set_row_value(&mut self, row_id: u32, value: impl Into<String>) -> Result<(), FormEngineError> {
        self.engine.set_artifact_row_value_for(self.form_id, self.profile, row_id, value)
    }

    #[inline]
    pub fn set_combination(&mut self, mode: CombinationMode) -> Result<(), FormEngineError> {
        self.engine.set_combination_mode_for(self.form_id, self.profile, mode)
    }

    #[inline]
    pub fn toggle_include(&mut self) -> Result<bool, FormEngineError> {
        self.engine.toggle_include_external_for(self.form_id, self.profile)
    }

    #[inline]
    pub fn view(&self) -> Result<FormView, FormEngineError> {
        self.engine.view_for(self.form_id, self.profile)
    }

    #[inline]
    pub fn instance(&self) -> Result<FormInstance, FormEngineError> {
        self.engine.instance_for(self.form_id, self.profile)
    }
}
