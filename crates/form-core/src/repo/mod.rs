pub mod types;
pub use types::{FormInstance, FormRepository};
pub use types::{build_form_profile, FormProfile, InMemoryFormRepository};
