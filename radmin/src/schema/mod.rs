//! Prisma schema loading
//!
//! The generator works from the datamodel in `api/db/schema.prisma`. This
//! module parses it into [`Datamodel`] without involving the Prisma toolchain.

pub mod model;
pub mod parser;

use std::path::Path;

pub use model::{Datamodel, Enum, Field, FieldDefault, FieldKind, Model};
pub use parser::parse_schema;

use crate::error::{RadminError, Result};

/// Read and parse a `schema.prisma` file
///
/// # Errors
///
/// Returns [`RadminError::NotFound`] if the file does not exist, or a parse
/// error if its contents are malformed.
pub fn parse_schema_file(path: &Path) -> Result<Datamodel> {
    if !path.is_file() {
        return Err(RadminError::NotFound {
            what: "schema.prisma",
            path: path.to_path_buf(),
        });
    }

    let source = std::fs::read_to_string(path).map_err(|err| RadminError::io(path, err))?;
    let datamodel = parse_schema(&source)?;

    tracing::debug!(
        path = %path.display(),
        models = datamodel.models.len(),
        enums = datamodel.enums.len(),
        "parsed schema"
    );

    Ok(datamodel)
}
