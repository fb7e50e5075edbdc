//! Contrato del editor de texto en línea y refrescos diferidos.
//!
//! El editor embebido recalcula su layout sólo cuando está visible; al
//! mostrar la entrada de texto en línea hay que pedirle un `refresh` DESPUÉS
//! de que la pasada de render actual termine. La cola `DeferredRefresh`
//! modela ese ordenamiento de forma explícita: las acciones encolan, el
//! controller drena al final de cada pasada. El efecto es puramente
//! cosmético; el estado del formulario no depende de él.

use std::collections::HashMap;

use form_core::FormEngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// El id no refiere a un widget de editor registrado. Es un error de
    /// precondición del host: no se captura ni se reintenta.
    #[error("element '{0}' does not reference an editor widget")]
    WidgetNotFound(String),
    #[error(transparent)]
    Engine(#[from] FormEngineError),
}

/// Contrato mínimo de un editor embebido.
pub trait EditorWidget {
    fn content(&self) -> String;
    fn set_content(&mut self, text: &str);
    /// Recalcula el layout del editor; necesario tras volverse visible.
    fn refresh(&mut self);
}

/// Editor en memoria para tests y para el binario de demostración.
#[derive(Debug, Default)]
pub struct PlainEditor {
    content: String,
    refreshes: u32,
}

impl PlainEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(text: impl Into<String>) -> Self {
        Self { content: text.into(),
               refreshes: 0 }
    }

    /// Cantidad de refrescos aplicados (para verificar el diferimiento).
    pub fn refresh_count(&self) -> u32 {
        self.refreshes
    }
}

impl EditorWidget for PlainEditor {
    fn content(&self) -> String {
        self.content.clone()
    }
    fn set_content(&mut self, text: &str) {
        self.content = text.to_string();
    }
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

/// Registro de editores por id de elemento.
#[derive(Default)]
pub struct EditorRegistry {
    editors: HashMap<String, Box<dyn EditorWidget>>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, editor: Box<dyn EditorWidget>) {
        self.editors.insert(id.into(), editor);
    }

    /// Resuelve un editor registrado.
    ///
    /// # Errores
    /// `AdapterError::WidgetNotFound` si el id no está registrado.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut (dyn EditorWidget + 'static), AdapterError> {
        self.editors
            .get_mut(id)
            .map(|e| e.as_mut())
            .ok_or_else(|| AdapterError::WidgetNotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Result<&dyn EditorWidget, AdapterError> {
        self.editors
            .get(id)
            .map(|e| e.as_ref())
            .ok_or_else(|| AdapterError::WidgetNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.editors.contains_key(id)
    }
}

/// Cola de refrescos de editor pendientes. Un encolado por solicitud, sin
/// deduplicar: cada solicitud original producía su propio timer.
#[derive(Debug, Default)]
pub struct DeferredRefresh {
    pending: Vec<String>,
}

impl DeferredRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, editor_id: impl Into<String>) {
        self.pending.push(editor_id.into());
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Aplica todos los refrescos pendientes, en orden de encolado, y
    /// devuelve cuántos aplicó. Se invoca al terminar la pasada de render.
    ///
    /// # Errores
    /// `AdapterError::WidgetNotFound` si algún id encolado no está
    /// registrado; los anteriores ya quedaron aplicados.
    pub fn drain(&mut self, registry: &mut EditorRegistry) -> Result<usize, AdapterError> {
        let pending = std::mem::take(&mut self.pending);
        let applied = pending.len();
        for id in pending {
            registry.get_mut(&id)?.refresh();
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingEditor {
        hits: Rc<Cell<u32>>,
        text: String,
    }

    impl EditorWidget for CountingEditor {
        fn content(&self) -> String {
            self.text.clone()
        }
        fn set_content(&mut self, text: &str) {
            self.text = text.to_string();
        }
        fn refresh(&mut self) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn refreshes_wait_until_drain() {
        let hits = Rc::new(Cell::new(0));
        let mut registry = EditorRegistry::new();
        registry.register("text-editor",
                          Box::new(CountingEditor { hits: Rc::clone(&hits),
                                                    text: String::new() }));

        let mut queue = DeferredRefresh::new();
        queue.schedule("text-editor");
        queue.schedule("text-editor");
        assert_eq!(queue.pending(), 2);
        assert_eq!(hits.get(), 0);

        let applied = queue.drain(&mut registry).expect("drain");
        assert_eq!(applied, 2);
        assert_eq!(hits.get(), 2);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn missing_widget_is_a_precondition_failure() {
        let mut registry = EditorRegistry::new();
        let err = registry.get_mut("ghost").err().unwrap();
        assert!(matches!(err, AdapterError::WidgetNotFound(ref id) if id == "ghost"));

        let mut queue = DeferredRefresh::new();
        queue.schedule("ghost");
        assert!(queue.drain(&mut registry).is_err());
    }

    #[test]
    fn editor_content_round_trips() {
        let mut editor = PlainEditor::with_content("{}");
        assert_eq!(editor.content(), "{}");
        editor.set_content("{\"a\":1}");
        assert_eq!(editor.content(), "{\"a\":1}");
        editor.refresh();
        assert_eq!(editor.refresh_count(), 1);
    }
}
