// form-domain library entry point
pub mod artifact_collection;
pub mod artifact_kind;
pub mod artifact_row;
pub mod combination;
pub mod content_kind;
pub mod error;
pub mod policy;
pub use artifact_collection::ExternalArtifactCollection;
pub use artifact_kind::ArtifactKind;
pub use artifact_row::ExternalArtifactRow;
pub use combination::CombinationMode;
pub use content_kind::ContentKind;
pub use error::DomainError;
pub use policy::{resolve_policy, ArtifactPolicy, ValidationTypeOption};
