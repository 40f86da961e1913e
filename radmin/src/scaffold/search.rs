//! Search-field heuristic
//!
//! Each generated list view has a search box. The service searches one text
//! column with `ILIKE`; this module picks that column.

use crate::error::{RadminError, Result};
use crate::schema::{Field, Model};

/// Marks the field to search on, overriding the heuristic
pub const SEARCH_DIRECTIVE: &str = "@radmin-search";

/// Candidates in priority order; the first filled slot wins
#[derive(Default)]
struct Candidates<'a> {
    unique_username: Option<&'a str>,
    email: Option<&'a str>,
    username: Option<&'a str>,
    name: Option<&'a str>,
    first_name: Option<&'a str>,
    full_name: Option<&'a str>,
    non_id_non_unique: Option<&'a str>,
    non_id: Option<&'a str>,
    any_string: Option<&'a str>,
}

impl<'a> Candidates<'a> {
    fn consider_user_field(&mut self, field: &'a Field) {
        let lower = field.name.to_lowercase();
        let normalized: String = lower.chars().filter(|c| *c != '-' && *c != '_').collect();
        let name = Some(field.name.as_str());

        match lower.as_str() {
            "email" => self.email = name,
            "username" if field.is_unique || field.is_id => self.unique_username = name,
            "username" => self.username = name,
            "name" => self.name = name,
            _ if normalized == "firstname" => self.first_name = name,
            _ if normalized == "fullname" => self.full_name = name,
            _ => {}
        }
    }

    fn consider_string_field(&mut self, field: &'a Field) {
        let name = Some(field.name.as_str());

        if !field.is_id && !field.is_unique && self.non_id_non_unique.is_none() {
            self.non_id_non_unique = name;
        } else if !field.is_id && self.non_id.is_none() {
            self.non_id = name;
        } else if self.any_string.is_none() {
            self.any_string = name;
        }
    }

    fn best(&self) -> Option<&'a str> {
        self.unique_username
            .or(self.email)
            .or(self.username)
            .or(self.name)
            .or(self.first_name)
            .or(self.full_name)
            .or(self.non_id_non_unique)
            .or(self.non_id)
            .or(self.any_string)
    }
}

fn is_user_model(model_name: &str) -> bool {
    let lower = model_name.to_lowercase();
    lower.ends_with("user") || lower.ends_with("users")
}

/// Pick the field the generated service searches on
///
/// A field documented with `@radmin-search` always wins. User-like models
/// prefer username, email and name columns. Otherwise the first plain text
/// column is used, falling back to the first field of any type.
///
/// # Errors
///
/// Returns a schema error if the model has no fields.
///
/// # Examples
///
/// ```
/// # use radmin::scaffold::search::find_search_field;
/// let schema = radmin::schema::parse_schema(
///     "model Post {\n  id Int @id\n  title String\n}\n",
/// ).unwrap();
/// let post = schema.model("Post").unwrap();
/// assert_eq!(find_search_field(post).unwrap(), "title");
/// ```
pub fn find_search_field(model: &Model) -> Result<&str> {
    let user_model = is_user_model(&model.name);
    let mut candidates = Candidates::default();

    for field in &model.fields {
        if field.has_directive(SEARCH_DIRECTIVE) {
            return Ok(&field.name);
        }

        if field.field_type != "String" {
            continue;
        }

        if user_model {
            candidates.consider_user_field(field);
        }
        candidates.consider_string_field(field);
    }

    let search_field = candidates
        .best()
        .or_else(|| model.fields.first().map(|field| field.name.as_str()))
        .ok_or_else(|| {
            RadminError::schema(format!("Couldn't find a search field for `{}`", model.name))
        })?;

    tracing::debug!(model = %model.name, field = search_field, "search field");
    Ok(search_field)
}
