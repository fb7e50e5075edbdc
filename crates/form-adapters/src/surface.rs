//! Primitivas de mutación de la superficie de presentación.
//!
//! El motor nunca toca una UI concreta: el controller traduce cada
//! `FormView` a llamadas sobre este trait. Una superficie real (DOM, TUI,
//! etc.) implementa las primitivas; los tests usan `RecordingSurface`, que
//! sólo registra las llamadas en orden.

use form_domain::{ArtifactKind, CombinationMode, ContentKind};
use serde::{Deserialize, Serialize};

/// Llamada registrada por `RecordingSurface`, en orden de emisión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceOp {
    ShowPrimaryInput(ContentKind),
    SetSectionVisible(bool),
    SetIncludeToggleVisible(bool),
    InsertRow { id: u32, placeholder: String },
    RemoveRow { id: u32 },
    ShowRowInput { id: u32, kind: ArtifactKind },
    SetRowValue { id: u32, value: String },
    SetRowRemovable { id: u32, removable: bool },
    SetCombinationVisible(bool),
    SetCombinationMode(CombinationMode),
    SetSubmitEnabled(bool),
}

/// Contrato mínimo de la superficie de presentación.
pub trait FormSurface {
    /// Muestra la entrada principal del kind dado y oculta las demás.
    fn show_primary_input(&mut self, kind: ContentKind);
    /// Visibilidad de la sección de artefactos externos completa.
    fn set_section_visible(&mut self, visible: bool);
    /// Visibilidad del checkbox "incluir artefactos externos".
    fn set_include_toggle_visible(&mut self, visible: bool);
    /// Inserta una fila nueva con su placeholder.
    fn insert_row(&mut self, id: u32, placeholder: &str);
    /// Elimina una fila existente.
    fn remove_row(&mut self, id: u32);
    /// Muestra el input de la fila para su kind activo y oculta el otro.
    fn show_row_input(&mut self, id: u32, kind: ArtifactKind);
    /// Refleja el valor visible de la fila (nombre de archivo o URI).
    fn set_row_value(&mut self, id: u32, value: &str);
    /// Habilita u oculta el botón de quitar de la fila.
    fn set_row_removable(&mut self, id: u32, removable: bool);
    /// Visibilidad del selector de modo de combinación.
    fn set_combination_visible(&mut self, visible: bool);
    /// Valor mostrado del selector de modo de combinación.
    fn set_combination_mode(&mut self, mode: CombinationMode);
    /// Estado del botón de envío. Siempre la última llamada de una pasada.
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Doble de prueba: registra todas las primitivas invocadas, en orden.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borra el registro (típico entre acciones de un test).
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Último estado del botón de envío registrado, si hubo alguno.
    pub fn last_submit_state(&self) -> Option<bool> {
        self.ops.iter().rev().find_map(|op| match op {
                                  SurfaceOp::SetSubmitEnabled(enabled) => Some(*enabled),
                                  _ => None,
                              })
    }

    /// Ids insertados durante el registro actual.
    pub fn inserted_rows(&self) -> Vec<u32> {
        self.ops.iter()
                .filter_map(|op| match op {
                    SurfaceOp::InsertRow { id, .. } => Some(*id),
                    _ => None,
                })
                .collect()
    }

    /// Ids eliminados durante el registro actual.
    pub fn removed_rows(&self) -> Vec<u32> {
        self.ops.iter()
                .filter_map(|op| match op {
                    SurfaceOp::RemoveRow { id } => Some(*id),
                    _ => None,
                })
                .collect()
    }
}

impl FormSurface for RecordingSurface {
    fn show_primary_input(&mut self, kind: ContentKind) {
        self.ops.push(SurfaceOp::ShowPrimaryInput(kind));
    }
    fn set_section_visible(&mut self, visible: bool) {
        self.ops.push(SurfaceOp::SetSectionVisible(visible));
    }
    fn set_include_toggle_visible(&mut self, visible: bool) {
        self.ops.push(SurfaceOp::SetIncludeToggleVisible(visible));
    }
    fn insert_row(&mut self, id: u32, placeholder: &str) {
        self.ops.push(SurfaceOp::InsertRow { id,
                                             placeholder: placeholder.to_string() });
    }
    fn remove_row(&mut self, id: u32) {
        self.ops.push(SurfaceOp::RemoveRow { id });
    }
    fn show_row_input(&mut self, id: u32, kind: ArtifactKind) {
        self.ops.push(SurfaceOp::ShowRowInput { id, kind });
    }
    fn set_row_value(&mut self, id: u32, value: &str) {
        self.ops.push(SurfaceOp::SetRowValue { id,
                                               value: value.to_string() });
    }
    fn set_row_removable(&mut self, id: u32, removable: bool) {
        self.ops.push(SurfaceOp::SetRowRemovable { id, removable });
    }
    fn set_combination_visible(&mut self, visible: bool) {
        self.ops.push(SurfaceOp::SetCombinationVisible(visible));
    }
    fn set_combination_mode(&mut self, mode: CombinationMode) {
        self.ops.push(SurfaceOp::SetCombinationMode(mode));
    }
    fn set_submit_enabled(&mut self, enabled: bool) {
        self.ops.push(SurfaceOp::SetSubmitEnabled(enabled));
    }
}
