//! Core FormEngine implementation

use crate::derive::{derive_view, FormView};
use crate::engine::EngineBuilderInit;
use crate::errors::FormEngineError;
use crate::event::{EventStore, FormEvent, FormEventKind, InMemoryEventStore};
use crate::repo::{FormInstance, FormProfile, FormRepository, InMemoryFormRepository};
use form_domain::{ArtifactKind, CombinationMode, ContentKind};
use log::{debug, warn};
use uuid::Uuid;

/// Motor de estado del formulario de carga
///
/// Orquesta las acciones de usuario: reconstruye la instancia por replay,
/// valida contra el dominio, emite los eventos resultantes (incluidos los
/// forzados por política) y deja la derivación de vistas a `derive_view`.
pub struct FormEngine<E, R>
    where E: EventStore,
          R: FormRepository
{
    event_store: E,
    repository: R,
    profile: Option<FormProfile>,
    default_form_id: Option<Uuid>,
}

impl FormEngine<InMemoryEventStore, InMemoryFormRepository> {
    /// Crea un nuevo builder con stores en memoria
    #[inline]
    pub fn new() -> EngineBuilderInit<InMemoryEventStore, InMemoryFormRepository> {
        EngineBuilderInit { event_store: InMemoryEventStore::default(),
                            repository: InMemoryFormRepository::new() }
    }
}

impl<E, R> FormEngine<E, R>
    where E: EventStore,
          R: FormRepository
{
    /// Crea un nuevo builder para configurar el engine con stores propios
    #[inline]
    pub fn builder(event_store: E, repository: R) -> EngineBuilderInit<E, R> {
        EngineBuilderInit { event_store, repository }
    }

    /// Crea un nuevo motor con los stores proporcionados, sin perfil aún
    pub fn new_with_stores(event_store: E, repository: R) -> Self {
        Self { event_store,
               repository,
               profile: None,
               default_form_id: None }
    }

    /// Configura el perfil del formulario
    pub fn set_profile(&mut self, profile: FormProfile) {
        self.profile = Some(profile);
    }

    /// Copia del perfil configurado
    pub fn current_profile(&self) -> Result<FormProfile, FormEngineError> {
        self.profile.clone().ok_or(FormEngineError::MissingProfile)
    }

    /// Define/genera un `form_id` por defecto si no existe aún y lo retorna.
    pub fn ensure_default_form_id(&mut self) -> Uuid {
        match self.default_form_id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                self.default_form_id = Some(id);
                id
            }
        }
    }

    /// Fija explícitamente un `form_id` por defecto.
    pub fn set_default_form_id(&mut self, form_id: Uuid) {
        self.default_form_id = Some(form_id);
    }

    /// Obtiene el `form_id` por defecto si está configurado.
    pub fn default_form_id(&self) -> Option<Uuid> {
        self.default_form_id
    }

    fn append(&mut self, form_id: Uuid, kind: FormEventKind) -> FormEvent {
        let ev = self.event_store.append_kind(form_id, kind);
        debug!("event appended form_id={} seq={} kind={:?}", ev.form_id, ev.seq, ev.kind);
        ev
    }

    fn load_instance(&self, form_id: Uuid, profile: &FormProfile) -> FormInstance {
        let events = self.event_store.list(form_id);
        self.repository.load(form_id, &events, profile)
    }

    fn require_initialized(&self, form_id: Uuid, profile: &FormProfile) -> Result<FormInstance, FormEngineError> {
        let instance = self.load_instance(form_id, profile);
        if !instance.initialized {
            return Err(FormEngineError::NotInitialized);
        }
        Ok(instance)
    }

    /// Da de alta el formulario por defecto y retorna su id.
    ///
    /// Con un perfil de opción única el selector ni siquiera se muestra: la
    /// opción queda seleccionada de entrada, incluida la fila mínima si su
    /// política es `Required`.
    pub fn initialize(&mut self) -> Result<Uuid, FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.initialize_for(form_id, &profile)?;
        Ok(form_id)
    }

    /// Da de alta un formulario concreto.
    pub fn initialize_for(&mut self, form_id: Uuid, profile: &FormProfile) -> Result<(), FormEngineError> {
        let instance = self.load_instance(form_id, profile);
        if instance.initialized {
            return Err(FormEngineError::AlreadyInitialized);
        }
        self.append(form_id,
                    FormEventKind::FormInitialized { profile_hash: profile.profile_hash.clone(),
                                                     option_count: profile.len() });
        if profile.len() == 1 {
            let label = profile.options[0].label.clone();
            self.apply_selection(form_id, profile, Some(label));
        }
        Ok(())
    }

    /// Cambia la selección del tipo de validación en el formulario por
    /// defecto.
    pub fn select_validation_type(&mut self, value: Option<String>) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.select_validation_type_for(form_id, &profile, value)
    }

    /// Cambia la selección del tipo de validación. Todo cambio limpia las
    /// filas de artefactos; si la política resultante es `Required` se emite
    /// el alta forzada de la fila mínima, y el modo de combinación vuelve al
    /// por defecto al quedar oculto el control.
    pub fn select_validation_type_for(&mut self,
                                      form_id: Uuid,
                                      profile: &FormProfile,
                                      value: Option<String>)
                                      -> Result<(), FormEngineError> {
        self.require_initialized(form_id, profile)?;
        self.apply_selection(form_id, profile, value);
        Ok(())
    }

    fn apply_selection(&mut self, form_id: Uuid, profile: &FormProfile, value: Option<String>) {
        let instance = self.load_instance(form_id, profile);
        let policy = profile.policy_for(value.as_deref());
        self.append(form_id, FormEventKind::ValidationTypeSelected { value });

        if !instance.artifacts.is_empty() {
            self.append(form_id, FormEventKind::ArtifactRowsReset { removed: instance.artifacts.len() });
        }

        // El checkbox de inclusión vuelve desmarcado con cada selección
        if instance.include_external {
            self.append(form_id, FormEventKind::IncludeExternalToggled { include: false, forced: true });
        }

        // La numeración continúa tras el reset: la marca de agua no se toca
        let mut artifacts = instance.artifacts.clone();
        artifacts.reset();
        if let Some(row_id) = artifacts.enforce_required(policy) {
            self.append(form_id, FormEventKind::ArtifactRowAdded { row_id, forced: true });
        }

        // Con 0 o 1 filas el control de combinación queda oculto
        if instance.combination_mode != profile.default_combination {
            self.append(form_id,
                        FormEventKind::CombinationModeChanged { mode: profile.default_combination,
                                                                forced: true });
        }
    }

    /// Cambia el tipo de entrada principal del formulario por defecto.
    pub fn change_content_kind(&mut self, kind: ContentKind) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.change_content_kind_for(form_id, &profile, kind)
    }

    /// Cambia el tipo de entrada principal. Reseleccionar el kind activo no
    /// emite nada.
    pub fn change_content_kind_for(&mut self,
                                   form_id: Uuid,
                                   profile: &FormProfile,
                                   kind: ContentKind)
                                   -> Result<(), FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        if instance.content_kind == kind {
            return Ok(());
        }
        self.append(form_id, FormEventKind::ContentKindChanged { kind });
        Ok(())
    }

    /// Registra el valor de la entrada principal de un kind en el formulario
    /// por defecto.
    pub fn set_primary_value(&mut self, kind: ContentKind, value: impl Into<String>) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.set_primary_value_for(form_id, &profile, kind, value)
    }

    /// Registra el valor de la entrada principal de un kind. Los valores de
    /// kinds inactivos se conservan, como los inputs ocultos del formulario.
    pub fn set_primary_value_for(&mut self,
                                 form_id: Uuid,
                                 profile: &FormProfile,
                                 kind: ContentKind,
                                 value: impl Into<String>)
                                 -> Result<(), FormEngineError> {
        self.require_initialized(form_id, profile)?;
        self.append(form_id, FormEventKind::PrimaryValueChanged { kind, value: value.into() });
        Ok(())
    }

    /// Agrega una fila de artefacto externo al formulario por defecto y
    /// retorna su id.
    pub fn add_artifact_row(&mut self) -> Result<u32, FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.add_artifact_row_for(form_id, &profile)
    }

    /// Agrega una fila de artefacto externo. El id lo asigna la colección
    /// (marca de agua + 1) y nunca se reutiliza.
    pub fn add_artifact_row_for(&mut self, form_id: Uuid, profile: &FormProfile) -> Result<u32, FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        let mut artifacts = instance.artifacts;
        let row_id = artifacts.add();
        self.append(form_id, FormEventKind::ArtifactRowAdded { row_id, forced: false });
        Ok(row_id)
    }

    /// Elimina una fila del formulario por defecto.
    pub fn remove_artifact_row(&mut self, row_id: u32) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.remove_artifact_row_for(form_id, &profile, row_id)
    }

    /// Elimina una fila de artefacto externo.
    ///
    /// # Errores
    /// * `Domain(UnknownRow)` si el id no existe.
    /// * `Domain(InvalidOperation)` si es la única fila bajo política
    ///   `Required`; no se emite ningún evento en ese caso.
    pub fn remove_artifact_row_for(&mut self,
                                   form_id: Uuid,
                                   profile: &FormProfile,
                                   row_id: u32)
                                   -> Result<(), FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        let policy = instance.policy(profile);
        let mut artifacts = instance.artifacts.clone();
        if let Err(err) = artifacts.remove(row_id, policy) {
            warn!("artifact row removal refused form_id={} row_id={} err={}", form_id, row_id, err);
            return Err(err.into());
        }
        self.append(form_id, FormEventKind::ArtifactRowRemoved { row_id });

        if artifacts.len() <= 1 && instance.combination_mode != profile.default_combination {
            self.append(form_id,
                        FormEventKind::CombinationModeChanged { mode: profile.default_combination,
                                                                forced: true });
        }
        Ok(())
    }

    /// Cambia el kind de una fila del formulario por defecto.
    pub fn set_artifact_row_kind(&mut self, row_id: u32, kind: ArtifactKind) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.set_artifact_row_kind_for(form_id, &profile, row_id, kind)
    }

    /// Cambia el kind de una fila; el valor anterior se descarta en el
    /// replay. Reseleccionar el kind activo no emite nada.
    pub fn set_artifact_row_kind_for(&mut self,
                                     form_id: Uuid,
                                     profile: &FormProfile,
                                     row_id: u32,
                                     kind: ArtifactKind)
                                     -> Result<(), FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        let row = instance.artifacts
                          .get(row_id)
                          .ok_or(form_domain::DomainError::UnknownRow(row_id))?;
        if row.kind() == kind {
            return Ok(());
        }
        self.append(form_id, FormEventKind::ArtifactRowKindChanged { row_id, kind });
        Ok(())
    }

    /// Registra el valor de una fila del formulario por defecto.
    pub fn set_artifact_row_value(&mut self, row_id: u32, value: impl Into<String>) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.set_artifact_row_value_for(form_id, &profile, row_id, value)
    }

    /// Registra el valor de una fila para su kind activo.
    pub fn set_artifact_row_value_for(&mut self,
                                      form_id: Uuid,
                                      profile: &FormProfile,
                                      row_id: u32,
                                      value: impl Into<String>)
                                      -> Result<(), FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        if instance.artifacts.get(row_id).is_none() {
            return Err(form_domain::DomainError::UnknownRow(row_id).into());
        }
        self.append(form_id, FormEventKind::ArtifactRowValueChanged { row_id, value: value.into() });
        Ok(())
    }

    /// Cambia el modo de combinación en el formulario por defecto.
    pub fn set_combination_mode(&mut self, mode: CombinationMode) -> Result<(), FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.set_combination_mode_for(form_id, &profile, mode)
    }

    /// Cambia el modo de combinación por acción del usuario.
    ///
    /// # Errores
    /// `Domain(InvalidOperation)` si el control está oculto (menos de dos
    /// filas); el formulario nunca ofrece ese cambio y no se emite ningún
    /// evento.
    pub fn set_combination_mode_for(&mut self,
                                    form_id: Uuid,
                                    profile: &FormProfile,
                                    mode: CombinationMode)
                                    -> Result<(), FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        if instance.artifacts.len() <= 1 {
            warn!("combination change refused form_id={} mode={} rows={}",
                  form_id, mode, instance.artifacts.len());
            let refusal = format!("combination control hidden with {} row(s)", instance.artifacts.len());
            return Err(form_domain::DomainError::InvalidOperation(refusal).into());
        }
        if instance.combination_mode == mode {
            return Ok(());
        }
        self.append(form_id, FormEventKind::CombinationModeChanged { mode, forced: false });
        Ok(())
    }

    /// Invierte el checkbox de inclusión de artefactos (política Optional)
    /// en el formulario por defecto y retorna el nuevo estado.
    pub fn toggle_include_external(&mut self) -> Result<bool, FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.toggle_include_external_for(form_id, &profile)
    }

    /// Invierte el checkbox de inclusión de artefactos externos. Afecta la
    /// visibilidad de la sección, nunca la evaluación de envío.
    pub fn toggle_include_external_for(&mut self, form_id: Uuid, profile: &FormProfile) -> Result<bool, FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        let include = !instance.include_external;
        self.append(form_id, FormEventKind::IncludeExternalToggled { include, forced: false });
        Ok(include)
    }

    /// Vista derivada del formulario por defecto.
    pub fn view(&mut self) -> Result<FormView, FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.view_for(form_id, &profile)
    }

    /// Vista derivada de un formulario concreto. Replay completo más
    /// derivación pura; dos llamadas consecutivas devuelven el mismo
    /// fingerprint.
    pub fn view_for(&self, form_id: Uuid, profile: &FormProfile) -> Result<FormView, FormEngineError> {
        let instance = self.require_initialized(form_id, profile)?;
        Ok(derive_view(&instance, profile))
    }

    /// Instancia reconstruida del formulario por defecto (para la capa de
    /// políticas, que evalúa sobre el estado y no sobre la vista).
    pub fn instance(&mut self) -> Result<FormInstance, FormEngineError> {
        let profile = self.current_profile()?;
        let form_id = self.ensure_default_form_id();
        self.require_initialized(form_id, &profile)
    }

    /// Instancia reconstruida de un formulario concreto.
    pub fn instance_for(&self, form_id: Uuid, profile: &FormProfile) -> Result<FormInstance, FormEngineError> {
        self.require_initialized(form_id, profile)
    }

    /// Acceso de sólo lectura al store de eventos.
    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Lista eventos del formulario por defecto
    pub fn events(&self) -> Option<Vec<FormEvent>> {
        self.default_form_id.map(|fid| self.event_store.list(fid))
    }

    /// Lista eventos de un formulario concreto
    pub fn list_events_for(&self, form_id: Uuid) -> Vec<FormEvent> {
        self.event_store.list(form_id)
    }

    /// Variante compacta de eventos para el formulario por defecto
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   FormEventKind::FormInitialized { .. } => "I",
                                   FormEventKind::ValidationTypeSelected { .. } => "T",
                                   FormEventKind::ContentKindChanged { .. } => "K",
                                   FormEventKind::PrimaryValueChanged { .. } => "P",
                                   FormEventKind::ArtifactRowAdded { .. } => "A",
                                   FormEventKind::ArtifactRowRemoved { .. } => "D",
                                   FormEventKind::ArtifactRowKindChanged { .. } => "G",
                                   FormEventKind::ArtifactRowValueChanged { .. } => "V",
                                   FormEventKind::ArtifactRowsReset { .. } => "R",
                                   FormEventKind::CombinationModeChanged { .. } => "C",
                                   FormEventKind::IncludeExternalToggled { .. } => "X",
                               })
                               .collect()
                     })
    }
}

impl Default for FormEngine<InMemoryEventStore, InMemoryFormRepository> {
    fn default() -> Self {
        Self::new_with_stores(InMemoryEventStore::default(), InMemoryFormRepository::new())
    }
}
