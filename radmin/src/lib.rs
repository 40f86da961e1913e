//! radmin: admin panels for RedwoodJS projects, generated from the Prisma schema
//!
//! Point it at an admin Redwood project and it writes paginated, searchable
//! CRUD pages for every model in the schema, guarded by dbAuth with its own
//! approval-gated user table.
//!
//! # Pipeline
//!
//! 1. [`schema`] parses `api/db/schema.prisma` into a [`schema::Datamodel`]
//! 2. [`scaffold`] classifies each field and renders pages, cells and forms
//! 3. [`patch`] edits the project's routes, app, auth and config files in place
//! 4. [`sdl`] runs the framework's SDL generator and adds paginated search
//!
//! External commands go through [`process::CommandRunner`] so every step can
//! run against a recording runner in tests.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use radmin::{format::Passthrough, project::ProjectLayout, scaffold::AdminGenerator};
//!
//! # fn main() -> radmin::error::Result<()> {
//! let layout = ProjectLayout::open("store-admin".as_ref())?;
//! let schema = radmin::schema::parse_schema_file(&layout.schema_path())?;
//!
//! let generator = AdminGenerator::new(&schema, &layout.app_name()?, 10)?;
//! for file in generator.generate()? {
//!     layout.write_generated(&file, &Passthrough)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod observability;
pub mod patch;
pub mod process;
pub mod project;
pub mod scaffold;
pub mod schema;
pub mod sdl;

pub use config::RadminConfig;
pub use error::{RadminError, Result};
pub use project::ProjectLayout;
