//! Field classification
//!
//! Decides how each model field is edited in forms and shown in lists and
//! detail views. The decision is keyed by the field's [`RenderType`]; name
//! heuristics and `///` directives refine it for strings.

use std::fmt;

use serde::{Serialize, Serializer};

use super::helpers::TemplateHelpers;
use crate::error::Result;
use crate::schema::{Datamodel, Field, FieldDefault, FieldKind, Model};

/// Enums with more values than this get a dropdown instead of radio buttons
pub const MAX_RADIO_OPTIONS: usize = 8;

/// Forces the rich-text editor for a string field
pub const MULTILINE_DIRECTIVE: &str = "@radmin-multiline";

/// Forces a single-line input for a string field
pub const SINGLELINE_DIRECTIVE: &str = "@radmin-singleline";

/// Documentation lines starting with this are directives, not descriptions
const DIRECTIVE_PREFIX: &str = "@radmin";

/// Words in a humanized field name that suggest long-form text
const RICH_TEXT_WORDS: &[&str] = &["description", "desc", "reply", "message", "comment"];

/// Field names that are long-form text as a whole
const RICH_TEXT_NAMES: &[&str] = &["text", "body", "post", "bio"];

/// Form input component used for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    /// Single-line text input
    TextField,
    /// Rich-text editor
    WysiwygEditor,
    /// Dropdown
    SelectField,
    /// Radio button group
    RadioField,
    /// Checkbox or checkbox group
    CheckboxField,
    /// Date and time picker
    DatetimeLocalField,
    /// Numeric input
    NumberField,
    /// Multi-line plain text
    TextAreaField,
}

impl Widget {
    /// Component name as imported in the generated form
    #[must_use]
    pub const fn component(self) -> &'static str {
        match self {
            Self::TextField => "TextField",
            Self::WysiwygEditor => "WysiwygEditor",
            Self::SelectField => "SelectField",
            Self::RadioField => "RadioField",
            Self::CheckboxField => "CheckboxField",
            Self::DatetimeLocalField => "DatetimeLocalField",
            Self::NumberField => "NumberField",
            Self::TextAreaField => "TextAreaField",
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component())
    }
}

impl Serialize for Widget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.component())
    }
}

/// The type a field is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderType<'a> {
    /// Single enum value
    Enum,
    /// List of enum values
    EnumList,
    /// Scalar type name (`String`, `Int`, ...), `Json` for composite types
    Scalar(&'a str),
}

impl<'a> RenderType<'a> {
    /// Render type of `field`
    #[must_use]
    pub fn of(field: &'a Field) -> Self {
        match (field.kind, field.is_list) {
            (FieldKind::Enum, true) => Self::EnumList,
            (FieldKind::Enum, false) => Self::Enum,
            // Embedded documents are edited as JSON
            (FieldKind::Composite, _) => Self::Scalar("Json"),
            _ => Self::Scalar(field.field_type.as_str()),
        }
    }

    const fn is_enum(self) -> bool {
        matches!(self, Self::Enum | Self::EnumList)
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Scalar("Int" | "BigInt" | "Float" | "Decimal"))
    }
}

/// One option of an enum field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubOption {
    /// Enum value as stored
    pub value: String,
    /// Humanized value for labels
    pub display_name: String,
}

/// Everything a template needs to render one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDirective {
    /// Field name
    pub name: String,
    /// Humanized field name used in labels and headers
    pub display_name: String,
    /// Input component
    pub widget: Widget,
    /// `defaultValue` or `defaultChecked`
    pub default_prop: &'static str,
    /// Default value as a JS literal (`"draft"`, `true`, `undefined`)
    pub default_value: String,
    /// Value of the `validation` prop, empty when the field has none
    pub validation: String,
    /// Function turning the stored value into the input's value
    pub deserialize_function: Option<&'static str>,
    /// Formatter used on the detail page
    pub display_function: Option<&'static str>,
    /// Formatter used in list tables
    pub list_display_function: &'static str,
    /// `emptyAs={null}` for optional inputs
    pub empty_as: String,
    /// `setValue` prop for the rich-text editor
    pub set_value: String,
    /// Field documentation without directive lines
    pub description: Option<String>,
    /// `description` as a JS string literal, safe inside a JSX expression
    pub description_literal: Option<String>,
    /// Enum options
    pub sub_data: Option<Vec<SubOption>>,
    /// Whether the field is required
    pub is_required: bool,
}

/// Classifies the fields of one model
pub struct FieldClassifier<'a> {
    model: &'a Model,
    datamodel: &'a Datamodel,
}

impl<'a> FieldClassifier<'a> {
    /// Create a classifier for `model`, resolving enums in `datamodel`
    #[must_use]
    pub const fn new(model: &'a Model, datamodel: &'a Datamodel) -> Self {
        Self { model, datamodel }
    }

    /// Classify the field called `field_name`
    ///
    /// # Errors
    ///
    /// Returns a schema error if the model has no such field, or if the field
    /// refers to an enum the datamodel does not define.
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::render::{FieldClassifier, Widget};
    /// let schema = radmin::schema::parse_schema(
    ///     "model Post {\n  id Int @id\n  published Boolean\n}\n",
    /// ).unwrap();
    /// let post = schema.model("Post").unwrap();
    /// let directive = FieldClassifier::new(post, &schema).classify("published").unwrap();
    /// assert_eq!(directive.widget, Widget::CheckboxField);
    /// assert_eq!(directive.list_display_function, "checkboxInputTag");
    /// ```
    pub fn classify(&self, field_name: &str) -> Result<RenderDirective> {
        let field = self.model.field(field_name)?;
        let render_type = RenderType::of(field);

        let enum_values = if render_type.is_enum() {
            Some(&self.datamodel.enum_def(&field.field_type)?.values)
        } else {
            None
        };

        let widget = widget_for(render_type, field, enum_values.map_or(0, Vec::len));

        let description = description(field);

        let directive = RenderDirective {
            name: field.name.clone(),
            display_name: TemplateHelpers::humanize(&field.name),
            widget,
            default_prop: default_prop(render_type),
            default_value: default_value(field),
            validation: validation(render_type, field.is_required),
            deserialize_function: deserialize_function(render_type),
            display_function: display_function(render_type),
            list_display_function: list_display_function(render_type, field),
            empty_as: if field.is_required || widget == Widget::CheckboxField {
                String::new()
            } else {
                "emptyAs={null}".to_string()
            },
            set_value: if widget == Widget::WysiwygEditor {
                format!(
                    "setValue={{(value: string) => formMethods.setValue('{}', value)}}",
                    field.name
                )
            } else {
                String::new()
            },
            description_literal: description.as_deref().map(js_string),
            description,
            sub_data: enum_values.map(|values| {
                values
                    .iter()
                    .map(|value| SubOption {
                        value: value.clone(),
                        display_name: TemplateHelpers::humanize(value),
                    })
                    .collect()
            }),
            is_required: field.is_required,
        };

        tracing::debug!(
            model = %self.model.name,
            field = %field.name,
            widget = %directive.widget,
            "classified field"
        );

        Ok(directive)
    }

    /// Classify every field in `fields`, failing on the first error
    ///
    /// # Errors
    ///
    /// See [`FieldClassifier::classify`].
    pub fn classify_all<'f>(&self, fields: impl IntoIterator<Item = &'f Field>) -> Result<Vec<RenderDirective>> {
        fields
            .into_iter()
            .map(|field| self.classify(&field.name))
            .collect()
    }
}

fn widget_for(render_type: RenderType<'_>, field: &Field, enum_value_count: usize) -> Widget {
    match render_type {
        RenderType::Scalar("String") => string_widget(field),
        RenderType::Enum if enum_value_count > MAX_RADIO_OPTIONS => Widget::SelectField,
        RenderType::Enum => Widget::RadioField,
        RenderType::EnumList | RenderType::Scalar("Boolean") => Widget::CheckboxField,
        RenderType::Scalar("DateTime") => Widget::DatetimeLocalField,
        RenderType::Scalar("Int" | "BigInt" | "Float" | "Decimal") => Widget::NumberField,
        RenderType::Scalar("Json") => Widget::TextAreaField,
        RenderType::Scalar(_) => Widget::TextField,
    }
}

fn string_widget(field: &Field) -> Widget {
    if field.has_directive(MULTILINE_DIRECTIVE) {
        return Widget::WysiwygEditor;
    }

    let name = TemplateHelpers::humanize(&field.name).to_lowercase();
    let words: Vec<&str> = name.split_whitespace().collect();

    if field.has_directive(SINGLELINE_DIRECTIVE) || words.contains(&"short") {
        return Widget::TextField;
    }

    if RICH_TEXT_NAMES.contains(&name.as_str())
        || words.iter().any(|word| RICH_TEXT_WORDS.contains(word))
    {
        return Widget::WysiwygEditor;
    }

    Widget::TextField
}

fn default_prop(render_type: RenderType<'_>) -> &'static str {
    match render_type {
        RenderType::Enum | RenderType::EnumList | RenderType::Scalar("Boolean") => {
            "defaultChecked"
        }
        RenderType::Scalar(_) => "defaultValue",
    }
}

fn default_value(field: &Field) -> String {
    match &field.default {
        Some(FieldDefault::String(value) | FieldDefault::EnumValue(value)) => js_string(value),
        Some(FieldDefault::Boolean(value)) => value.to_string(),
        Some(FieldDefault::Number(value)) => value.clone(),
        _ => "undefined".to_string(),
    }
}

/// Quote `value` as a JS string literal
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn validation(render_type: RenderType<'_>, is_required: bool) -> String {
    let required = if is_required { ", required: true" } else { "" };

    match render_type {
        RenderType::Enum | RenderType::EnumList | RenderType::Scalar("Boolean") => String::new(),
        RenderType::Scalar("Json") => format!("{{{{ valueAsJSON: true{required} }}}}"),
        numeric if numeric.is_numeric() => format!("{{{{ valueAsNumber: true{required} }}}}"),
        _ if is_required => "{{ required: true }}".to_string(),
        _ => String::new(),
    }
}

fn deserialize_function(render_type: RenderType<'_>) -> Option<&'static str> {
    match render_type {
        RenderType::Scalar("DateTime") => Some("formatDatetime"),
        RenderType::Scalar("Json") => Some("JSON.stringify"),
        _ => None,
    }
}

fn display_function(render_type: RenderType<'_>) -> Option<&'static str> {
    match render_type {
        RenderType::Enum | RenderType::EnumList => Some("formatEnum"),
        RenderType::Scalar("Boolean") => Some("checkboxInputTag"),
        RenderType::Scalar("DateTime") => Some("timeTag"),
        RenderType::Scalar("Json") => Some("jsonDisplay"),
        RenderType::Scalar(_) => None,
    }
}

fn list_display_function(render_type: RenderType<'_>, field: &Field) -> &'static str {
    match render_type {
        RenderType::Scalar("Json") => "jsonTruncate",
        _ => display_function(render_type).unwrap_or(if field.is_id {
            "truncateId"
        } else if field.name.ends_with("Id") {
            "truncateMaybeId"
        } else {
            "truncate"
        }),
    }
}

fn description(field: &Field) -> Option<String> {
    let lines: Vec<&str> = field
        .documentation
        .as_deref()?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(DIRECTIVE_PREFIX))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
