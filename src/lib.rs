//! FormFlow Rust Library
//!
//! Este crate actúa como la librería central de FormFlow:
//! - Expone `config` para cargar el entorno y construir el perfil del
//!   formulario de carga (opciones del selector, placeholder, combinación).
//!
//! La lógica de estado vive en los crates `form-domain`, `form-core`,
//! `form-policies` y `form-adapters`; este nivel sólo arma las piezas.
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
