//! Datamodel types produced by the schema parser

use serde::Serialize;

use crate::error::{RadminError, Result};

/// Documentation line that excludes a model from the admin panel
pub const SKIP_DIRECTIVES: &[&str] = &["@radmin skip", "@radmin-skip"];

/// Prisma scalar type names
pub const SCALAR_TYPES: &[&str] = &[
    "String",
    "Boolean",
    "Int",
    "BigInt",
    "Float",
    "Decimal",
    "DateTime",
    "Json",
    "Bytes",
    "Unsupported",
];

/// Parsed `schema.prisma` datamodel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Datamodel {
    /// Models in declaration order
    pub models: Vec<Model>,
    /// Enums in declaration order
    pub enums: Vec<Enum>,
    /// Composite `type` blocks, embedded in models rather than stored as rows
    pub types: Vec<Model>,
}

/// A `model` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    /// Model name as declared (e.g. `Post`, `UserProfile`)
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// `///` documentation, lines joined with `\n`
    pub documentation: Option<String>,
}

/// An `enum` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    /// Enum name
    pub name: String,
    /// Values in declaration order
    pub values: Vec<String>,
    /// `///` documentation
    pub documentation: Option<String>,
}

/// What a field's type refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Built-in scalar
    Scalar,
    /// Enum declared in the schema
    Enum,
    /// Relation to another model
    Object,
    /// Embedded composite type
    Composite,
}

/// A field's `@default(..)` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldDefault {
    /// String literal
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// Numeric literal, kept as written
    Number(String),
    /// Bare identifier, used for enum defaults
    EnumValue(String),
    /// Function call such as `now()` or `autoincrement()`
    Function {
        /// Function name
        name: String,
    },
    /// Anything else (list defaults), kept as written
    Other(String),
}

/// A model field
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared type name without modifiers (`String`, `Role`, `Post`)
    pub field_type: String,
    /// Scalar, enum or relation
    pub kind: FieldKind,
    /// `false` when declared with `?`
    pub is_required: bool,
    /// Declared with `[]`
    pub is_list: bool,
    /// Has `@unique`
    pub is_unique: bool,
    /// Has `@id`
    pub is_id: bool,
    /// Has `@updatedAt`
    pub is_updated_at: bool,
    /// `@default(..)` value
    pub default: Option<FieldDefault>,
    /// `///` documentation, lines joined with `\n`
    pub documentation: Option<String>,
}

impl Field {
    /// Whether the field declares a default value
    #[must_use]
    pub const fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    /// Whether the field is a relation to another model
    #[must_use]
    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Object
    }

    /// Whether the field is filled in by the database or Prisma
    ///
    /// Ids with defaults, `@updatedAt` fields and fields defaulting to
    /// `now()` or `autoincrement()` never appear in create/edit forms.
    #[must_use]
    pub fn is_auto_generated(&self) -> bool {
        let default_fn = match &self.default {
            Some(FieldDefault::Function { name }) => Some(name.as_str()),
            _ => None,
        };

        (self.is_id && self.has_default_value())
            || self.is_updated_at
            || matches!(default_fn, Some("now" | "autoincrement"))
    }

    /// Whether the documentation contains `directive`
    #[must_use]
    pub fn has_directive(&self, directive: &str) -> bool {
        self.documentation
            .as_deref()
            .is_some_and(|doc| doc.contains(directive))
    }
}

impl Model {
    /// Whether the model is documented with a skip directive
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.documentation.as_deref().is_some_and(|doc| {
            doc.lines()
                .any(|line| SKIP_DIRECTIVES.contains(&line.trim()))
        })
    }

    /// Look up a field by name
    ///
    /// # Errors
    ///
    /// Returns a schema error if the model has no such field.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| {
                RadminError::schema(format!(
                    "Couldn't find field `{name}` on model `{}`",
                    self.name
                ))
            })
    }

    /// The single-field `@id` of this model
    ///
    /// # Errors
    ///
    /// Returns a schema error if no field is marked `@id`.
    pub fn id_field(&self) -> Result<&Field> {
        self.fields.iter().find(|field| field.is_id).ok_or_else(|| {
            RadminError::schema(format!(
                "Couldn't find the id field for model `{}`",
                self.name
            ))
        })
    }

    /// Fields that are not relations (foreign key scalars are kept)
    pub fn scalar_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.is_relation())
    }

    /// Fields shown in create and edit forms
    pub fn form_fields(&self) -> impl Iterator<Item = &Field> {
        self.scalar_fields()
            .filter(|field| !field.is_auto_generated())
    }
}

impl Datamodel {
    /// Look up a model by name
    ///
    /// # Errors
    ///
    /// Returns a schema error if the model does not exist.
    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| RadminError::schema(format!("Could not find model `{name}`")))
    }

    /// Look up an enum by name
    ///
    /// # Errors
    ///
    /// Returns a schema error if the enum does not exist.
    pub fn enum_def(&self, name: &str) -> Result<&Enum> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RadminError::schema(format!("Couldn't find enum values for `{name}`")))
    }

    /// Models that get admin pages, i.e. all models not marked as skipped
    pub fn admin_models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter().filter(|model| {
            if model.is_skipped() {
                tracing::info!(model = %model.name, "skipping model");
                false
            } else {
                true
            }
        })
    }
}
