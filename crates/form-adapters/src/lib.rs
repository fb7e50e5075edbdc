//! form-adapters: Capa de adaptación Motor ↔ Superficie de UI (UF5)
//!
//! Este crate provee:
//! - Un trait `FormSurface` con las primitivas de mutación que cualquier
//!   superficie de presentación debe ofrecer, y `RecordingSurface`, un doble
//!   de prueba que registra cada llamada en orden.
//! - El contrato `EditorWidget` para el editor de texto en línea, con
//!   registro por id y una cola de refrescos diferidos que se drena al
//!   terminar cada pasada de render.
//! - `FormController`: el adaptador delgado que despacha cada acción al
//!   motor, recalcula la vista y la decisión de envío completas y las
//!   vuelca sobre la superficie.
//!
//! Nota: el controller no guarda estado derivado; lo único que retiene es la
//! lista de ids de fila ya insertados en la superficie, porque las filas son
//! la única estructura retenida del lado de la UI.

pub mod controller;
pub mod editor;
pub mod surface;

pub use controller::{FormController, INLINE_EDITOR};
pub use editor::{AdapterError, DeferredRefresh, EditorRegistry, EditorWidget, PlainEditor};
pub use surface::{FormSurface, RecordingSurface, SurfaceOp};
