//! Admin panel scaffolding
//!
//! Classifies model fields, renders the page templates and produces the
//! files of the generated admin panel.

pub mod assets;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod search;
pub mod templates;

pub use generator::{AdminGenerator, GeneratedFile};
pub use helpers::{ModelNameVariants, TemplateHelpers, AUTH_MODEL};
pub use render::{FieldClassifier, RenderDirective, RenderType, Widget};
pub use search::find_search_field;
pub use templates::TemplateRegistry;
