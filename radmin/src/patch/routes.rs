//! `web/src/Routes.tsx` patching
//!
//! All admin routes live in one `<Set wrap={RadminLayout}>` region placed
//! right before `</Router>`. Each run removes the previous region and writes a
//! fresh one, so models that were removed or renamed lose their routes.

use std::collections::HashSet;

use regex::Regex;

use super::{indent_of, SourceFile};
use crate::error::{RadminError, Result};
use crate::scaffold::ModelNameVariants;
use crate::schema::Model;

/// Routes file, relative to the project root
pub const ROUTES_PATH: &str = "web/src/Routes.tsx";

const LAYOUT_IMPORT: &str = "import RadminLayout from 'src/layouts/RadminLayout'";
const REGION_OPEN: &str = "<Set wrap={RadminLayout}>";
const REGION_CLOSE: &str = "</Set>";
/// Attribute identifying a route to the admin root; such lines are dropped
/// before the region is rewritten
const RADMIN_PATH_MARKER: &str = "path=\"/radmin\"";
const ROUTER_NAMES: &[&str] = &["Set", "Private"];

/// The routes one model contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoutes {
    /// `PascalCase` model name
    pub pascal: String,
    /// `PascalCase` plural model name
    pub pascal_plural: String,
    /// URL segment under `/radmin`
    pub route_name: String,
    /// Type of the `id` route param; `None` for strings
    pub id_param_type: Option<String>,
}

impl ModelRoutes {
    /// Routes for `model`
    ///
    /// # Errors
    ///
    /// Returns a schema error if the model has no id field.
    pub fn new(model: &Model, app_name: &str) -> Result<Self> {
        let names = ModelNameVariants::new(&model.name, app_name);
        let id_type = &model.id_field()?.field_type;

        Ok(Self {
            pascal: names.pascal,
            pascal_plural: names.pascal_plural,
            route_name: names.route_name,
            id_param_type: (id_type != "String").then(|| id_type.clone()),
        })
    }

    fn lines(&self, indent: &str) -> [String; 4] {
        let Self {
            pascal: p,
            pascal_plural: pp,
            route_name: route,
            ..
        } = self;
        let id = self
            .id_param_type
            .as_ref()
            .map_or_else(|| "{id}".to_string(), |ty| format!("{{id:{ty}}}"));

        [
            format!("{indent}<Route path=\"/radmin/{route}/new\" page={{Radmin{p}New{p}Page}} name=\"radminNew{p}\" />"),
            format!("{indent}<Route path=\"/radmin/{route}/{id}/edit\" page={{Radmin{p}Edit{p}Page}} name=\"radminEdit{p}\" />"),
            format!("{indent}<Route path=\"/radmin/{route}/{id}\" page={{Radmin{p}{p}Page}} name=\"radmin{p}\" />"),
            format!("{indent}<Route path=\"/radmin/{route}\" page={{Radmin{p}{pp}Page}} name=\"radmin{pp}\" />"),
        ]
    }
}

/// Rewrite the admin routes region of a routes file
///
/// # Errors
///
/// Returns an anchor error if the file has no `@redwoodjs/router` import,
/// no `<Router>` line when a home redirect is needed, or no `</Router>`.
pub fn patch_routes(file: &mut SourceFile, models: &[ModelRoutes]) -> Result<()> {
    file.remove_lines(|line| line.contains(RADMIN_PATH_MARKER));

    ensure_layout_import(file)?;
    ensure_router_imports(file)?;

    file.remove_region(REGION_OPEN, REGION_CLOSE);

    ensure_home_route(file)?;
    insert_region(file, models)?;

    tracing::info!(models = models.len(), "updated routes");
    Ok(())
}

fn ensure_layout_import(file: &mut SourceFile) -> Result<()> {
    if file.find_first(&Regex::new(r"^\s*import RadminLayout from")?).is_some() {
        return Ok(());
    }

    let layout_import = Regex::new(r"^\s*import .+Layout\b.* from 'src/layouts")?;
    let src_import = Regex::new(r"^\s*import .+ from 'src/")?;
    let relative_import = Regex::new(r"^\s*import .+ from '\./")?;

    let index = file
        .find_last(&layout_import)
        .or_else(|| file.find_last(&src_import))
        .map(|index| index + 1)
        .or_else(|| file.find_first(&relative_import))
        .unwrap_or(0);

    file.insert(index, [LAYOUT_IMPORT]);
    Ok(())
}

fn ensure_router_imports(file: &mut SourceFile) -> Result<()> {
    let from_router = Regex::new(r"from '@redwoodjs/router'")?;
    let end = file
        .find_first(&from_router)
        .ok_or_else(|| RadminError::anchor("the @redwoodjs/router import", file.path()))?;

    let single_line = file.line(end).is_some_and(|line| line.contains('{'));
    let start = if single_line {
        end
    } else {
        let import_start = Regex::new(r"^\s*import\b")?;
        (0..end)
            .rev()
            .find(|&index| file.line(index).is_some_and(|line| import_start.is_match(line)))
            .ok_or_else(|| RadminError::anchor("the @redwoodjs/router import", file.path()))?
    };

    let imported = file.lines()[start..=end].join("\n");
    let imported: HashSet<&str> = imported
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .collect();
    let missing: Vec<&str> = ROUTER_NAMES
        .iter()
        .copied()
        .filter(|name| !imported.contains(name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    if single_line {
        let line = file.lines()[end].clone();
        file.replace_line(end, [add_named_imports(&line, &missing)]);
    } else {
        let member_indent = file
            .line(start + 1)
            .filter(|_| start + 1 < end)
            .map_or("  ", indent_of)
            .to_string();
        file.insert(
            end,
            missing.iter().map(|name| format!("{member_indent}{name},")),
        );
    }

    Ok(())
}

/// Add `names` to a one-line named import, keeping its brace spacing
fn add_named_imports(line: &str, names: &[&str]) -> String {
    let Some(close) = line.rfind('}') else {
        return line.to_string();
    };

    let head = line[..close].trim_end();
    let spacing = &line[head.len()..close];
    let separator = if head.ends_with(',') || head.ends_with('{') { " " } else { ", " };

    format!("{head}{separator}{}{spacing}{}", names.join(", "), &line[close..])
}

fn ensure_home_route(file: &mut SourceFile) -> Result<()> {
    if file.contains("path=\"/\"") {
        return Ok(());
    }

    let router_open = Regex::new(r"^\s*<Router.*>\s*$")?;
    let index = file
        .find_first(&router_open)
        .ok_or_else(|| RadminError::anchor("where the routes start (<Router>)", file.path()))?;
    let indent = format!("{}  ", file.line(index).map_or("", indent_of));

    file.insert(index + 1, [format!("{indent}<Route path=\"/\" redirect=\"/radmin\" />")]);
    Ok(())
}

fn insert_region(file: &mut SourceFile, models: &[ModelRoutes]) -> Result<()> {
    let router_close = Regex::new(r"^\s*</Router>")?;
    let not_found = Regex::new(r"^\s*<Route\s+(.*\s)?notfound\b")?;

    let close = file
        .find_first(&router_close)
        .ok_or_else(|| RadminError::anchor("</Router>", file.path()))?;
    let indent = format!("{}  ", file.line(close).map_or("", indent_of));

    let index = match close.checked_sub(1) {
        Some(previous) if file.line(previous).is_some_and(|line| not_found.is_match(line)) => previous,
        _ => close,
    };

    let mut region = vec![
        format!("{indent}{REGION_OPEN}"),
        format!("{indent}  <Route path=\"/radmin\" page={{RadminRadminPage}} name=\"radmin\" />"),
        format!("{indent}  <Route path=\"/radminLogin\" page={{RadminRadminLoginPage}} name=\"radminLogin\" />"),
        format!("{indent}  <Route path=\"/radminSignup\" page={{RadminRadminSignupPage}} name=\"radminSignup\" />"),
        format!("{indent}  <Private unauthenticated=\"radminLogin\">"),
    ];
    let model_indent = format!("{indent}    ");
    region.extend(models.iter().flat_map(|model| model.lines(&model_indent)));
    region.push(format!("{indent}  </Private>"));
    region.push(format!("{indent}{REGION_CLOSE}"));

    file.insert(index, region);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;
    use proptest::prelude::*;

    const ROUTES: &str = "// In this file, all Page components from 'src/pages` are auto-imported.

import { Router, Route } from '@redwoodjs/router'

import BlogLayout from 'src/layouts/BlogLayout'

const Routes = () => {
  return (
    <Router>
      <Route path=\"/\" page={HomePage} name=\"home\" />
      <Route notfound page={NotFoundPage} />
    </Router>
  )
}

export default Routes
";

    fn models() -> Vec<ModelRoutes> {
        let schema = parse_schema(
            "model Post {\n  id Int @id\n}\nmodel Tag {\n  id String @id\n}\nmodel RadminUser {\n  id Int @id\n}\n",
        )
        .unwrap();
        schema
            .models
            .iter()
            .map(|model| ModelRoutes::new(model, "store").unwrap())
            .collect()
    }

    fn patched(content: &str) -> String {
        let mut file = SourceFile::new(ROUTES_PATH, content);
        patch_routes(&mut file, &models()).unwrap();
        file.text()
    }

    #[test]
    fn test_layout_import_after_last_layout_import() {
        let out = patched(ROUTES);
        assert!(out.contains(
            "import BlogLayout from 'src/layouts/BlogLayout'\nimport RadminLayout from 'src/layouts/RadminLayout'\n"
        ));
    }

    #[test]
    fn test_layout_import_before_relative_import() {
        let routes = "import { Router, Route } from '@redwoodjs/router'\nimport x from './x'\n<Router>\n</Router>\n";
        let out = patched(routes);
        assert!(out.contains("'@redwoodjs/router'\nimport RadminLayout from 'src/layouts/RadminLayout'\nimport x from './x'"));
    }

    #[test]
    fn test_router_import_gains_set_and_private() {
        let out = patched(ROUTES);
        assert!(out.contains("import { Router, Route, Set, Private } from '@redwoodjs/router'"));
    }

    #[test]
    fn test_existing_router_names_are_kept() {
        let routes = ROUTES.replace("{ Router, Route }", "{ Private, Router, Route, Set }");
        let out = patched(&routes);
        assert!(out.contains("import { Private, Router, Route, Set } from '@redwoodjs/router'"));
    }

    #[test]
    fn test_multiline_router_import() {
        let routes = ROUTES.replace(
            "import { Router, Route } from '@redwoodjs/router'",
            "import {\n  Router,\n  Route,\n} from '@redwoodjs/router'",
        );
        let out = patched(&routes);
        assert!(out.contains("import {\n  Router,\n  Route,\n  Set,\n  Private,\n} from '@redwoodjs/router'"));
    }

    #[test]
    fn test_region_before_notfound_route() {
        let out = patched(ROUTES);
        let region = out.find("      <Set wrap={RadminLayout}>").unwrap();
        let not_found = out.find("<Route notfound").unwrap();
        assert!(region < not_found);
        assert!(out.contains("      </Set>\n      <Route notfound page={NotFoundPage} />\n    </Router>"));
    }

    #[test]
    fn test_model_routes() {
        let out = patched(ROUTES);
        assert!(out.contains(
            "          <Route path=\"/radmin/posts/{id:Int}/edit\" page={RadminPostEditPostPage} name=\"radminEditPost\" />"
        ));
        assert!(out.contains(
            "<Route path=\"/radmin/tags/{id}\" page={RadminTagTagPage} name=\"radminTag\" />"
        ));
        assert!(out.contains(
            "<Route path=\"/radmin/storeUsers\" page={RadminRadminUserRadminUsersPage} name=\"radminRadminUsers\" />"
        ));
        assert!(out.contains("        <Private unauthenticated=\"radminLogin\">"));
    }

    #[test]
    fn test_home_redirect_added_when_missing() {
        let routes = ROUTES.replace("      <Route path=\"/\" page={HomePage} name=\"home\" />\n", "");
        let out = patched(&routes);
        assert!(out.contains("    <Router>\n      <Route path=\"/\" redirect=\"/radmin\" />\n"));
    }

    #[test]
    fn test_stray_admin_root_route_is_dropped() {
        let routes = ROUTES.replace(
            "      <Route notfound",
            "      <Route path=\"/radmin\" page={RadminPostPostsPage} name=\"radminHome\" />\n      <Route notfound",
        );
        let out = patched(&routes);
        assert!(!out.contains("name=\"radminHome\""));
        assert!(out.contains("<Route path=\"/\" page={HomePage} name=\"home\" />"));
        assert!(out.contains("<Route path=\"/radmin/posts\""));
    }

    #[test]
    fn test_existing_home_route_kept() {
        let out = patched(ROUTES);
        assert!(!out.contains("redirect=\"/radmin\""));
    }

    #[test]
    fn test_missing_router_import_is_anchor_error() {
        let mut file = SourceFile::new(ROUTES_PATH, "<Router>\n</Router>\n");
        let err = patch_routes(&mut file, &models()).unwrap_err();
        assert!(matches!(err, RadminError::Anchor { .. }));
    }

    #[test]
    fn test_missing_router_close_is_anchor_error() {
        let mut file = SourceFile::new(
            ROUTES_PATH,
            "import { Router } from '@redwoodjs/router'\n<Router>\n",
        );
        let err = patch_routes(&mut file, &models()).unwrap_err();
        assert!(err.to_string().contains("</Router>"));
    }

    #[test]
    fn test_removed_models_lose_their_routes() {
        let once = patched(ROUTES);
        let mut file = SourceFile::new(ROUTES_PATH, &once);
        patch_routes(&mut file, &models()[..1]).unwrap();
        let out = file.text();
        assert!(out.contains("radminPosts"));
        assert!(!out.contains("radminTags"));
    }

    #[test]
    fn test_add_named_imports_spacing() {
        assert_eq!(
            add_named_imports("import {Router} from 'x'", &["Set"]),
            "import {Router, Set} from 'x'"
        );
        assert_eq!(
            add_named_imports("import { Router, } from 'x'", &["Set", "Private"]),
            "import { Router, Set, Private } from 'x'"
        );
    }

    fn model_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,8}"
    }

    proptest! {
        #[test]
        fn prop_patching_twice_equals_once(
            names in proptest::collection::btree_set(model_name(), 0..5),
            string_ids in proptest::collection::vec(any::<bool>(), 5),
            has_home in any::<bool>(),
            has_not_found in any::<bool>(),
        ) {
            let models: Vec<ModelRoutes> = names
                .iter()
                .zip(string_ids)
                .map(|(name, string_id)| ModelRoutes {
                    pascal: name.clone(),
                    pascal_plural: format!("{name}s"),
                    route_name: format!("{}s", name.to_lowercase()),
                    id_param_type: (!string_id).then(|| "Int".to_string()),
                })
                .collect();

            let mut routes = ROUTES.to_string();
            if !has_home {
                routes = routes.replace("      <Route path=\"/\" page={HomePage} name=\"home\" />\n", "");
            }
            if !has_not_found {
                routes = routes.replace("      <Route notfound page={NotFoundPage} />\n", "");
            }

            let mut file = SourceFile::new(ROUTES_PATH, &routes);
            patch_routes(&mut file, &models).unwrap();
            let once = file.text();

            let mut file = SourceFile::new(ROUTES_PATH, &once);
            patch_routes(&mut file, &models).unwrap();
            prop_assert_eq!(file.text(), once);
        }
    }
}
