// artifact_collection.rs
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{ArtifactKind, ArtifactPolicy, DomainError, ExternalArtifactRow};

/// Colección ordenada de filas de artefactos externos con asignación
/// monótona de identificadores. El orden de inserción se conserva para la
/// presentación; los ids crecen estrictamente durante toda la vida de la
/// colección y nunca se reutilizan, ni tras eliminar la fila más alta ni
/// tras un reset.
#[derive(Debug, Clone, Default)]
pub struct ExternalArtifactCollection {
    rows: IndexMap<u32, ExternalArtifactRow>,
    last_id: u32,
}

impl ExternalArtifactCollection {
    pub fn new() -> Self {
        ExternalArtifactCollection { rows: IndexMap::new(),
                                     last_id: 0 }
    }

    /// Agrega una fila nueva (kind archivo, valor vacío) y devuelve su id.
    /// El id es `último asignado + 1`; la marca de agua sube aunque la fila
    /// se elimine después. Nunca falla.
    pub fn add(&mut self) -> u32 {
        let id = self.last_id + 1;
        self.last_id = id;
        self.rows.insert(id, ExternalArtifactRow::new(id));
        id
    }

    /// Reinserta una fila con un id ya asignado. Sólo tiene sentido durante
    /// el replay del log de eventos: respeta el id original y ajusta la
    /// marca de agua para que los ids futuros sigan siendo únicos.
    ///
    /// # Errores
    /// `DomainError::InvalidOperation` si el id ya está presente.
    pub fn restore(&mut self, id: u32) -> Result<u32, DomainError> {
        if self.rows.contains_key(&id) {
            return Err(DomainError::InvalidOperation(format!("row id {id} already present")));
        }
        self.last_id = self.last_id.max(id);
        self.rows.insert(id, ExternalArtifactRow::new(id));
        Ok(id)
    }

    /// Indica si una fila concreta puede eliminarse bajo la política dada.
    /// La única fila de una colección con política `Required` no puede
    /// eliminarse; todo lo demás sí.
    pub fn can_remove(&self, policy: ArtifactPolicy) -> bool {
        !(policy.is_required() && self.rows.len() == 1)
    }

    /// Elimina una fila conservando el orden de las restantes y devuelve la
    /// fila eliminada.
    ///
    /// # Errores
    /// * `DomainError::UnknownRow` si el id no existe.
    /// * `DomainError::InvalidOperation` si es la única fila y la política
    ///   es `Required`. La capa de presentación debe consultar `can_remove`
    ///   antes; este rechazo protege frente a usos programáticos indebidos.
    pub fn remove(&mut self, id: u32, policy: ArtifactPolicy) -> Result<ExternalArtifactRow, DomainError> {
        if !self.rows.contains_key(&id) {
            return Err(DomainError::UnknownRow(id));
        }
        if !self.can_remove(policy) {
            return Err(DomainError::InvalidOperation("cannot remove the only row of a required artifact list".to_string()));
        }
        self.discard(id).ok_or(DomainError::UnknownRow(id))
    }

    /// Eliminación incondicional, sin validar política. Pensada para el
    /// replay de un log de eventos cuya validación ya ocurrió al emitirse;
    /// el flujo normal debe usar `remove`.
    pub fn discard(&mut self, id: u32) -> Option<ExternalArtifactRow> {
        self.rows.shift_remove(&id)
    }

    /// Garantiza el mínimo de la política `Required`: si la colección está
    /// vacía agrega exactamente una fila y devuelve su id. Con cualquier
    /// otra política, o si ya hay filas, no hace nada. Retirar la política
    /// después no elimina la fila forzada.
    pub fn enforce_required(&mut self, policy: ArtifactPolicy) -> Option<u32> {
        if policy.is_required() && self.rows.is_empty() {
            Some(self.add())
        } else {
            None
        }
    }

    /// Elimina todas las filas y devuelve cuántas había. La marca de agua de
    /// ids se conserva: las filas posteriores continúan la numeración.
    pub fn reset(&mut self) -> usize {
        let removed = self.rows.len();
        self.rows.clear();
        removed
    }

    /// Cambia el kind de una fila. Devuelve `true` si el valor anterior fue
    /// descartado por el cambio.
    ///
    /// # Errores
    /// `DomainError::UnknownRow` si el id no existe.
    pub fn set_kind(&mut self, id: u32, kind: ArtifactKind) -> Result<bool, DomainError> {
        self.rows
            .get_mut(&id)
            .map(|row| row.set_kind(kind))
            .ok_or(DomainError::UnknownRow(id))
    }

    /// Asigna el valor de una fila para su kind activo.
    ///
    /// # Errores
    /// `DomainError::UnknownRow` si el id no existe.
    pub fn set_value(&mut self, id: u32, value: impl Into<String>) -> Result<(), DomainError> {
        self.rows
            .get_mut(&id)
            .map(|row| row.set_value(value))
            .ok_or(DomainError::UnknownRow(id))
    }

    pub fn get(&self, id: u32) -> Option<&ExternalArtifactRow> {
        self.rows.get(&id)
    }

    /// Filas en orden de inserción.
    pub fn rows(&self) -> impl Iterator<Item = &ExternalArtifactRow> {
        self.rows.values()
    }

    /// Ids en orden de inserción.
    pub fn ids(&self) -> Vec<u32> {
        self.rows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indica si al menos una fila aporta un valor para su kind activo.
    pub fn any_row_with_value(&self) -> bool {
        self.rows.values().any(|row| row.has_value())
    }

    /// Último id asignado (marca de agua); 0 si nunca se asignó ninguno.
    pub fn last_id(&self) -> u32 {
        self.last_id
    }

    /// Hash del contenido ordenado `(id, kind, value)` para detectar cambios
    /// sin comparar estructuras completas.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for row in self.rows.values() {
            hasher.update(format!("{}|{}|{}\n", row.id(), row.kind().as_wire(), row.value()).as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for ExternalArtifactCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalArtifactCollection(rows: {}, last_id: {})", self.rows.len(), self.last_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_across_removals() -> Result<(), DomainError> {
        let mut col = ExternalArtifactCollection::new();
        let a = col.add();
        let b = col.add();
        let c = col.add();
        assert_eq!((a, b, c), (1, 2, 3));

        col.remove(b, ArtifactPolicy::Optional)?;
        assert_eq!(col.ids(), vec![1, 3]);

        let d = col.add();
        assert_eq!(d, 4);
        Ok(())
    }

    #[test]
    fn removing_the_highest_row_does_not_release_its_id() -> Result<(), DomainError> {
        let mut col = ExternalArtifactCollection::new();
        col.add();
        let b = col.add();
        col.remove(b, ArtifactPolicy::Optional)?;
        // Con "max existente + 1" el siguiente id sería 2 otra vez
        assert_eq!(col.add(), 3);
        Ok(())
    }

    #[test]
    fn reset_keeps_the_id_watermark() {
        let mut col = ExternalArtifactCollection::new();
        col.add();
        col.add();
        assert_eq!(col.reset(), 2);
        assert!(col.is_empty());
        assert_eq!(col.add(), 3);
    }

    #[test]
    fn enforce_required_adds_one_row_only_when_empty() {
        let mut col = ExternalArtifactCollection::new();
        assert_eq!(col.enforce_required(ArtifactPolicy::Required), Some(1));
        assert_eq!(col.len(), 1);
        // Idempotente: ya hay una fila
        assert_eq!(col.enforce_required(ArtifactPolicy::Required), None);
        assert_eq!(col.enforce_required(ArtifactPolicy::Optional), None);
        assert_eq!(col.enforce_required(ArtifactPolicy::None), None);
    }

    #[test]
    fn sole_required_row_cannot_be_removed() {
        let mut col = ExternalArtifactCollection::new();
        let id = col.add();
        assert!(!col.can_remove(ArtifactPolicy::Required));
        let err = col.remove(id, ArtifactPolicy::Required);
        assert!(matches!(err, Err(DomainError::InvalidOperation(_))));
        assert_eq!(col.len(), 1);

        // Con dos filas la eliminación vuelve a estar permitida
        col.add();
        assert!(col.can_remove(ArtifactPolicy::Required));
    }

    #[test]
    fn unknown_row_is_reported() {
        let mut col = ExternalArtifactCollection::new();
        assert!(matches!(col.remove(7, ArtifactPolicy::Optional), Err(DomainError::UnknownRow(7))));
        assert!(matches!(col.set_value(7, "x"), Err(DomainError::UnknownRow(7))));
        assert!(matches!(col.set_kind(7, ArtifactKind::Uri), Err(DomainError::UnknownRow(7))));
    }

    #[test]
    fn changing_kind_discards_the_value() -> Result<(), DomainError> {
        let mut col = ExternalArtifactCollection::new();
        let id = col.add();
        col.set_value(id, "schema.json")?;
        assert!(col.any_row_with_value());

        assert!(col.set_kind(id, ArtifactKind::Uri)?);
        assert!(!col.any_row_with_value());
        // Mismo kind: no descarta nada
        col.set_value(id, "http://example.com/schema.json")?;
        assert!(!col.set_kind(id, ArtifactKind::Uri)?);
        assert!(col.any_row_with_value());
        Ok(())
    }

    #[test]
    fn restore_raises_the_watermark() -> Result<(), DomainError> {
        let mut col = ExternalArtifactCollection::new();
        col.restore(5)?;
        assert_eq!(col.add(), 6);
        assert!(col.restore(5).is_err());
        Ok(())
    }

    #[test]
    fn content_hash_tracks_row_changes() -> Result<(), DomainError> {
        let mut col = ExternalArtifactCollection::new();
        let empty = col.content_hash();
        let id = col.add();
        let with_row = col.content_hash();
        assert_ne!(empty, with_row);

        col.set_value(id, "schema.json")?;
        assert_ne!(with_row, col.content_hash());
        Ok(())
    }
}
