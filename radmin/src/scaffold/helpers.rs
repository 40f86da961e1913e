//! Naming helpers for code generation
//!
//! Model names show up in many forms in the generated sources: `BlogPost`
//! becomes `blogPosts` in GraphQL queries, `BLOG_POSTS_PER_PAGE` in services
//! and "Blog posts" in headings. [`ModelNameVariants`] computes all of them
//! once per model.

use inflector::Inflector;
use serde::Serialize;

/// Name of the dbAuth model the generator adds to the schema
pub const AUTH_MODEL: &str = "RadminUser";

/// Case conversion and pluralization helpers
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to camelCase
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_camel_case("BlogPost"), "blogPost");
    /// assert_eq!(TemplateHelpers::to_camel_case("acm-admin"), "acmAdmin");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Convert string to `PascalCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_pascal_case("blogPost"), "BlogPost");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Convert string to kebab-case
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_kebab_case("UserProfile"), "user-profile");
    /// ```
    #[must_use]
    pub fn to_kebab_case(input: &str) -> String {
        input.to_kebab_case()
    }

    /// Convert string to `SCREAMING_SNAKE_CASE`
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_screaming_snake_case("BlogPosts"), "BLOG_POSTS");
    /// ```
    #[must_use]
    pub fn to_screaming_snake_case(input: &str) -> String {
        input.to_screaming_snake_case()
    }

    /// Pluralize a word, keeping its casing
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::pluralize("Post"), "Posts");
    /// assert_eq!(TemplateHelpers::pluralize("category"), "categories");
    /// ```
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Split identifiers into lower-case words with the first letter capitalized
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::humanize("blogPost"), "Blog post");
    /// assert_eq!(TemplateHelpers::humanize("first_name"), "First name");
    /// ```
    #[must_use]
    pub fn humanize(input: &str) -> String {
        input.to_sentence_case()
    }
}

/// Every spelling of a model name the templates need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelNameVariants {
    /// Name as declared in the schema
    pub name: String,
    /// `BlogPosts`
    pub plural: String,
    /// `blogPost`
    pub camel: String,
    /// `blogPosts`
    pub camel_plural: String,
    /// `BlogPost`
    pub pascal: String,
    /// `BlogPosts`
    pub pascal_plural: String,
    /// `BLOG_POST`
    pub capital: String,
    /// `BLOG_POSTS`
    pub capital_plural: String,
    /// `blog-post`
    pub kebab: String,
    /// `Blog post`
    pub humanized: String,
    /// `Blog posts`
    pub humanized_plural: String,
    /// Path segment under `/radmin/`
    pub route_name: String,
}

impl ModelNameVariants {
    /// Compute the variants for `model_name` in the app called `app_name`
    ///
    /// The auth model is presented as the app's users.
    ///
    /// # Examples
    ///
    /// ```
    /// # use radmin::scaffold::helpers::ModelNameVariants;
    /// let names = ModelNameVariants::new("BlogPost", "store");
    /// assert_eq!(names.camel_plural, "blogPosts");
    /// assert_eq!(names.capital_plural, "BLOG_POSTS");
    /// assert_eq!(names.humanized_plural, "Blog posts");
    ///
    /// let users = ModelNameVariants::new("RadminUser", "store");
    /// assert_eq!(users.humanized, "Store user");
    /// assert_eq!(users.route_name, "storeUsers");
    /// ```
    #[must_use]
    pub fn new(model_name: &str, app_name: &str) -> Self {
        let plural = TemplateHelpers::pluralize(model_name);
        let camel = TemplateHelpers::to_camel_case(model_name);
        let camel_plural = TemplateHelpers::pluralize(&camel);
        let pascal = TemplateHelpers::to_pascal_case(model_name);

        let (humanized, humanized_plural, route_name) = if model_name == AUTH_MODEL {
            let humanized = format!("{} user", TemplateHelpers::humanize(app_name));
            let humanized_plural = format!("{humanized}s");
            let route_name = format!("{}Users", TemplateHelpers::to_camel_case(app_name));
            (humanized, humanized_plural, route_name)
        } else {
            (
                TemplateHelpers::humanize(model_name),
                TemplateHelpers::humanize(&plural),
                camel_plural.clone(),
            )
        };

        Self {
            name: model_name.to_string(),
            capital: TemplateHelpers::to_screaming_snake_case(model_name),
            capital_plural: TemplateHelpers::to_screaming_snake_case(&plural),
            kebab: TemplateHelpers::to_kebab_case(model_name),
            pascal_plural: TemplateHelpers::pluralize(&pascal),
            plural,
            camel,
            camel_plural,
            pascal,
            humanized,
            humanized_plural,
            route_name,
        }
    }
}
