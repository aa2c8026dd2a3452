//! Domain types and pipeline stages for presentation generation:
//! specification model, input normalization, content outlining, the
//! renderer-agnostic slide model, and content validation.

pub mod collab;
pub mod error;
pub mod model;
pub mod normalize;
pub mod outline;
pub mod spec;
pub mod translate;
pub mod validate;

pub use collab::{CollabError, Expander, Transcriber, Unavailable};
pub use error::{Error, Result};
pub use model::{ImageAttachment, Slide, SlideKind, SlideModel};
pub use normalize::{InputNormalizer, NormalizedFragment, SourceKind};
pub use outline::{ExtractiveOutliner, Outliner};
pub use spec::{Footer, ImageRef, InputBundle, LengthTarget, SpecBuilder, Specification, Theme, UserInfo};
pub use translate::Catalog;
pub use validate::validate_model;
