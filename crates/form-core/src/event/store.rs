use std::collections::HashMap;
use chrono::Utc;
use uuid::Uuid;

use super::{FormEvent, FormEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, form_id: Uuid, kind: FormEventKind) -> FormEvent;
    /// Lista eventos de un formulario (orden ascendente por seq).
    fn list(&self, form_id: Uuid) -> Vec<FormEvent>;
    /// Indica si el formulario tiene al menos un evento registrado.
    fn has_any(&self, form_id: Uuid) -> bool {
        !self.list(form_id).is_empty()
    }
}

pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<FormEvent>>,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, form_id: Uuid, kind: FormEventKind) -> FormEvent {
        let entries = self.inner.entry(form_id).or_insert_with(Vec::new);
        let ev = FormEvent { seq: entries.len() as u64,
                             form_id,
                             kind,
                             ts: Utc::now() };
        entries.push(ev.clone());
        ev
    }

    fn list(&self, form_id: Uuid) -> Vec<FormEvent> {
        self.inner.get(&form_id).cloned().unwrap_or_default()
    }

    fn has_any(&self, form_id: Uuid) -> bool {
        self.inner.get(&form_id).map(|v| !v.is_empty()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_assigned_in_append_order() {
        let mut store = InMemoryEventStore::default();
        let form_id = Uuid::new_v4();
        assert!(!store.has_any(form_id));

        store.append_kind(form_id, FormEventKind::ValidationTypeSelected { value: None });
        store.append_kind(form_id, FormEventKind::ArtifactRowAdded { row_id: 1, forced: false });

        let events = store.list(form_id);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].seq, 0);
        assert_eq!(events[1].seq, 1);
        assert!(store.has_any(form_id));
        // Otro formulario no ve los eventos
        assert!(store.list(Uuid::new_v4()).is_empty());
    }
}
