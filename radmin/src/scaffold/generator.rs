//! Admin panel generator
//!
//! Turns the datamodel into the web side of the admin panel:
//! - list, detail, new and edit pages for every model
//! - one form component per model
//! - the shared layout, dashboard, login and signup pages
//! - shared components, formatters and styles

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::{json, Value};

use super::assets::{PAGINATOR, RADMIN_CSS, RADMIN_FORMATTERS, WYSIWYG_EDITOR};
use super::helpers::{ModelNameVariants, TemplateHelpers};
use super::render::{FieldClassifier, RenderDirective, Widget};
use super::templates::TemplateRegistry;
use crate::error::Result;
use crate::schema::{Datamodel, Field, Model};

/// Pages directory, relative to the project root
pub const PAGES_DIR: &str = "web/src/pages/Radmin";

/// Components directory, relative to the project root
pub const COMPONENTS_DIR: &str = "web/src/components/radmin";

/// Layout directory, relative to the project root
pub const LAYOUT_DIR: &str = "web/src/layouts/RadminLayout";

/// Stylesheet path, relative to the project root
pub const CSS_PATH: &str = "web/src/radmin.css";

/// Formatters path, relative to the project root
pub const FORMATTERS_PATH: &str = "web/src/lib/radminFormatters.tsx";

/// Admin panel generator
pub struct AdminGenerator<'a> {
    /// Parsed schema
    datamodel: &'a Datamodel,
    /// Models that get pages, in schema order
    models: Vec<&'a Model>,
    /// Name of the target app (last component of the project path)
    app_name: String,
    /// Rows per list page
    per_page: u32,
    /// Template registry
    templates: TemplateRegistry,
}

impl<'a> AdminGenerator<'a> {
    /// Create a generator for every non-skipped model in `datamodel`
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to compile.
    pub fn new(datamodel: &'a Datamodel, app_name: impl Into<String>, per_page: u32) -> Result<Self> {
        Ok(Self {
            datamodel,
            models: datamodel.admin_models().collect(),
            app_name: app_name.into(),
            per_page,
            templates: TemplateRegistry::new()?,
        })
    }

    /// Models that get admin pages
    #[must_use]
    pub fn models(&self) -> &[&'a Model] {
        &self.models
    }

    /// Generate every admin panel file
    ///
    /// # Errors
    ///
    /// Returns an error if a model is inconsistent (no id field, unknown
    /// enum) or a template fails to render. No files are produced for a run
    /// that fails.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();

        for model in &self.models {
            tracing::info!(model = %model.name, "generating pages");
            files.extend(self.generate_model(model)?);
        }

        files.extend(self.generate_shared()?);
        files.extend(Self::generate_assets());

        Ok(files)
    }

    /// Generate the stylesheet only
    #[must_use]
    pub fn generate_styles() -> GeneratedFile {
        GeneratedFile::new(CSS_PATH, RADMIN_CSS.to_string(), "Admin panel styles")
    }

    /// Generate the pages and form for one model
    fn generate_model(&self, model: &Model) -> Result<Vec<GeneratedFile>> {
        let context = self.model_context(model)?;
        let names = ModelNameVariants::new(&model.name, &self.app_name);
        let p = &names.pascal;
        let pp = &names.pascal_plural;
        let model_dir = format!("{PAGES_DIR}/{p}");

        let pages: [(&str, String, String); 11] = [
            ("model_list_page", format!("{model_dir}/{pp}Page/{pp}Page.tsx"), format!("List page for {p}")),
            ("model_list_cell", format!("{model_dir}/{pp}Page/{pp}Cell.tsx"), format!("List cell for {p}")),
            ("model_list", format!("{model_dir}/{pp}Page/{pp}.tsx"), format!("List component for {p}")),
            ("model_page", format!("{model_dir}/{p}Page/{p}Page.tsx"), format!("Detail page for {p}")),
            ("model_cell", format!("{model_dir}/{p}Page/{p}Cell.tsx"), format!("Detail cell for {p}")),
            ("model_component", format!("{model_dir}/{p}Page/{p}.tsx"), format!("Detail component for {p}")),
            ("new_model_page", format!("{model_dir}/New{p}Page/New{p}Page.tsx"), format!("New page for {p}")),
            ("new_model_component", format!("{model_dir}/New{p}Page/New{p}.tsx"), format!("New component for {p}")),
            ("edit_model_page", format!("{model_dir}/Edit{p}Page/Edit{p}Page.tsx"), format!("Edit page for {p}")),
            ("edit_model_cell", format!("{model_dir}/Edit{p}Page/Edit{p}Cell.tsx"), format!("Edit cell for {p}")),
            ("model_form", format!("{COMPONENTS_DIR}/{p}/{p}Form.tsx"), format!("Form for {p}")),
        ];

        pages
            .into_iter()
            .map(|(template, path, description)| {
                let content = self.templates.render(template, &context)?;
                Ok(GeneratedFile::new(path, content, description))
            })
            .collect()
    }

    /// Generate the layout, dashboard and auth pages
    fn generate_shared(&self) -> Result<Vec<GeneratedFile>> {
        let context = self.shared_context();

        let shared = [
            ("layout", format!("{LAYOUT_DIR}/RadminLayout.tsx"), "Admin layout"),
            ("radmin_page", format!("{PAGES_DIR}/RadminPage/RadminPage.tsx"), "Dashboard page"),
            ("radmin_login_page", format!("{PAGES_DIR}/RadminLoginPage/RadminLoginPage.tsx"), "Login page"),
            ("radmin_signup_page", format!("{PAGES_DIR}/RadminSignupPage/RadminSignupPage.tsx"), "Signup page"),
        ];

        shared
            .into_iter()
            .map(|(template, path, description)| {
                let content = self.templates.render(template, &context)?;
                Ok(GeneratedFile::new(path, content, description))
            })
            .collect()
    }

    fn generate_assets() -> Vec<GeneratedFile> {
        vec![
            GeneratedFile::new(
                format!("{COMPONENTS_DIR}/Paginator/Paginator.tsx"),
                PAGINATOR.to_string(),
                "Paginator component",
            ),
            GeneratedFile::new(
                format!("{COMPONENTS_DIR}/WysiwygEditor/WysiwygEditor.tsx"),
                WYSIWYG_EDITOR.to_string(),
                "Rich-text editor component",
            ),
            GeneratedFile::new(FORMATTERS_PATH, RADMIN_FORMATTERS.to_string(), "Display formatters"),
            Self::generate_styles(),
        ]
    }

    /// Template variables for one model
    fn model_context(&self, model: &Model) -> Result<Value> {
        let names = ModelNameVariants::new(&model.name, &self.app_name);
        let classifier = FieldClassifier::new(model, self.datamodel);
        let id_field = model.id_field()?;

        let fields = classifier.classify_all(model.scalar_fields())?;
        let form_fields = classifier.classify_all(model.form_fields())?;

        let list_formatters: BTreeSet<&str> =
            fields.iter().map(|field| field.list_display_function).collect();
        let display_formatters: BTreeSet<&str> =
            fields.iter().filter_map(|field| field.display_function).collect();
        let form_formatters: BTreeSet<&str> = form_fields
            .iter()
            .filter_map(|field| field.deserialize_function)
            .filter(|function| *function == "formatDatetime")
            .collect();

        let uses_wysiwyg = form_fields
            .iter()
            .any(|field| field.widget == Widget::WysiwygEditor);

        Ok(json!({
            "model": names,
            "id": id_context(id_field),
            "fields": fields,
            "form_fields": form_fields,
            "form_components": form_components(&form_fields),
            "list_formatters": list_formatters,
            "display_formatters": display_formatters,
            "form_formatters": form_formatters,
            "uses_wysiwyg": uses_wysiwyg,
            "per_page": self.per_page,
            "app_title": self.app_title(),
        }))
    }

    /// Template variables for the pages shared by all models
    fn shared_context(&self) -> Value {
        let models: Vec<ModelNameVariants> = self
            .models
            .iter()
            .map(|model| ModelNameVariants::new(&model.name, &self.app_name))
            .collect();

        json!({
            "models": models,
            "app_title": self.app_title(),
        })
    }

    fn app_title(&self) -> String {
        TemplateHelpers::humanize(&self.app_name)
    }
}

/// GraphQL and TypeScript types of a model's id
fn id_context(field: &Field) -> Value {
    let ts_type = match field.field_type.as_str() {
        "Int" | "BigInt" | "Float" | "Decimal" => "number",
        _ => "string",
    };

    json!({
        "name": field.name,
        "graphql_type": field.field_type,
        "ts_type": ts_type,
    })
}

/// `@redwoodjs/forms` components a form imports besides the fixed ones
fn form_components(form_fields: &[RenderDirective]) -> BTreeSet<&'static str> {
    form_fields
        .iter()
        .map(|field| match field.widget {
            Widget::WysiwygEditor => "HiddenField",
            widget => widget.component(),
        })
        .collect()
}

/// Represents a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

impl GeneratedFile {
    /// Create a generated file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: String, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content,
            description: description.into(),
        }
    }
}
