//! GraphQL SDL and service generation
//!
//! The framework's own `sdl` generator writes an SDL file and a service per
//! model. Radmin runs it into empty `services` and `graphql` directories, adds
//! a paginated search query to what it produced, and files the result under
//! `radmin/` next to the project's own services and SDLs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use regex::Regex;
use serde_json::json;

use crate::config::RadminConfig;
use crate::error::{RadminError, Result};
use crate::format::{formatter_for, SourceFormatter};
use crate::patch::{indent_of, SourceFile};
use crate::process::CommandRunner;
use crate::project::ProjectLayout;
use crate::scaffold::{find_search_field, ModelNameVariants, TemplateRegistry};
use crate::schema::{Datamodel, Model};

/// Directories the framework generator writes into, relative to the root
pub const GENERATOR_DIRS: [&str; 2] = ["api/src/services", "api/src/graphql"];

/// Sub-directory holding the generated files after a run
pub const RADMIN_DIR: &str = "radmin";

const DB_IMPORT: &str = "import { db } from 'src/lib/db'";

/// The project's own services and SDLs, moved aside while the generator runs
#[derive(Debug)]
pub struct GeneratorDirs {
    /// `(generator dir, backup dir)` pairs
    moves: Vec<(PathBuf, PathBuf)>,
}

impl GeneratorDirs {
    /// Move each generator directory to `<dir>_<stamp>` and create it empty
    ///
    /// A `radmin` sub-directory left by a previous run is deleted first.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a directory cannot be removed, renamed or
    /// created, or if a generator directory still exists after being moved.
    /// Directories already moved aside are put back before returning.
    pub fn prepare(layout: &ProjectLayout, stamp: i64) -> Result<Self> {
        let mut dirs = Self {
            moves: Vec::with_capacity(GENERATOR_DIRS.len()),
        };

        for relative in GENERATOR_DIRS {
            if let Err(err) = dirs.move_aside(&layout.path(relative), stamp) {
                dirs.roll_back();
                return Err(err);
            }
        }

        Ok(dirs)
    }

    fn move_aside(&mut self, dir: &Path, stamp: i64) -> Result<()> {
        let stale = dir.join(RADMIN_DIR);
        if stale.exists() {
            fs::remove_dir_all(&stale).map_err(|err| RadminError::io(&stale, err))?;
        }

        let backup = backup_path(dir, stamp);
        if dir.exists() {
            fs::rename(dir, &backup).map_err(|err| RadminError::io(dir, err))?;
        } else {
            fs::create_dir_all(&backup).map_err(|err| RadminError::io(&backup, err))?;
        }
        self.moves.push((dir.to_path_buf(), backup.clone()));

        if dir.exists() {
            return Err(RadminError::io(
                dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "still exists after moving it aside"),
            ));
        }
        fs::create_dir_all(dir).map_err(|err| RadminError::io(dir, err))?;

        tracing::info!(dir = %dir.display(), backup = %backup.display(), "moved aside");
        Ok(())
    }

    /// Put every backup back in place after a failed [`GeneratorDirs::prepare`]
    fn roll_back(&self) {
        for (dir, backup) in self.moves.iter().rev() {
            if dir.exists() {
                if let Err(err) = fs::remove_dir(dir) {
                    tracing::warn!(dir = %dir.display(), error = %err, "could not remove empty directory");
                    continue;
                }
            }
            match fs::rename(backup, dir) {
                Ok(()) => tracing::debug!(dir = %dir.display(), "rolled back"),
                Err(err) => {
                    tracing::warn!(backup = %backup.display(), error = %err, "could not restore backup");
                }
            }
        }
    }

    /// Move the generated files into `<backup>/radmin` and restore each backup
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a rename fails.
    pub fn restore(self) -> Result<()> {
        for (dir, backup) in &self.moves {
            let radmin = backup.join(RADMIN_DIR);
            fs::rename(dir, &radmin).map_err(|err| RadminError::io(dir, err))?;
            fs::rename(backup, dir).map_err(|err| RadminError::io(backup, err))?;
            tracing::debug!(dir = %dir.display(), "restored");
        }
        Ok(())
    }
}

fn backup_path(dir: &Path, stamp: i64) -> PathBuf {
    let name = dir
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
    dir.with_file_name(format!("{name}_{stamp}"))
}

/// Runs the framework's SDL generator and post-processes its output
pub struct SdlGenerator<'a> {
    layout: &'a ProjectLayout,
    datamodel: &'a Datamodel,
    runner: &'a dyn CommandRunner,
    formatter: Box<dyn SourceFormatter + 'a>,
    package_manager: &'a str,
    app_name: String,
    per_page: u32,
    templates: TemplateRegistry,
}

impl<'a> SdlGenerator<'a> {
    /// Create a generator for the project at `layout`
    ///
    /// # Errors
    ///
    /// Returns an error if the app name cannot be derived or the templates
    /// fail to compile.
    pub fn new(
        layout: &'a ProjectLayout,
        datamodel: &'a Datamodel,
        runner: &'a dyn CommandRunner,
        config: &'a RadminConfig,
    ) -> Result<Self> {
        Ok(Self {
            layout,
            datamodel,
            runner,
            formatter: formatter_for(config.formatter, runner, &config.package_manager, layout.root()),
            package_manager: &config.package_manager,
            app_name: layout.app_name()?,
            per_page: config.per_page,
            templates: TemplateRegistry::new()?,
        })
    }

    /// Generate SDLs and services for `models` into the `radmin` directories
    ///
    /// The project's own directories are put back even when a model fails;
    /// `on_model` is called after each model succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first generation error, or an I/O error if the directories
    /// cannot be moved.
    pub fn generate_all(&self, models: &[&Model], mut on_model: impl FnMut(&Model)) -> Result<()> {
        let dirs = GeneratorDirs::prepare(self.layout, Utc::now().timestamp_millis())?;

        let generated = models.iter().try_for_each(|&model| -> Result<()> {
            self.generate(model)?;
            on_model(model);
            Ok(())
        });
        let restored = dirs.restore();

        generated.and(restored)
    }

    /// Generate and post-process the SDL and service of `model`
    ///
    /// # Errors
    ///
    /// Returns an error if the framework generator fails, its output is
    /// missing an anchor, or a file cannot be written.
    pub fn generate(&self, model: &Model) -> Result<()> {
        tracing::info!(model = %model.name, "generating sdl");
        self.runner.run(
            self.layout.root(),
            self.package_manager,
            &["rw", "g", "sdl", "--no-tests", model.name.as_str()],
        )?;

        let names = ModelNameVariants::new(&model.name, &self.app_name);

        let sdl_path = self
            .layout
            .path(format!("api/src/graphql/{}.sdl.ts", names.camel_plural));
        let mut sdl = SourceFile::read(&sdl_path, "the generated SDL")?;
        patch_sdl(&mut sdl, model, self.datamodel, &names, &self.templates)?;
        sdl.format_with(self.formatter.as_ref())?;
        sdl.write()?;

        let service_path = self.layout.path(format!(
            "api/src/services/{0}/{0}.ts",
            names.camel_plural
        ));
        let mut service = SourceFile::read(&service_path, "the generated service")?;
        patch_service(&mut service, model, &names, &self.templates, self.per_page)?;
        service.format_with(self.formatter.as_ref())?;
        service.write()?;

        Ok(())
    }
}

/// Trim the SDL to the model's fields and add the paginated query
///
/// Inside the model type and its create and update inputs, members that are
/// not fields of the model, or that point at a model without admin pages,
/// are dropped.
///
/// # Errors
///
/// Returns an anchor error if the SDL has no `type Query {`.
pub fn patch_sdl(
    file: &mut SourceFile,
    model: &Model,
    datamodel: &Datamodel,
    names: &ModelNameVariants,
    templates: &TemplateRegistry,
) -> Result<()> {
    let p = &names.pascal;
    let blocks = [
        format!("  type {p} {{"),
        format!("  input Create{p}Input {{"),
        format!("  input Update{p}Input {{"),
    ];
    let member = Regex::new(r"    (\w+): ")?;

    let mut in_block = false;
    let dropped = file.remove_lines(|line| {
        if blocks.iter().any(|open| open == line) {
            in_block = true;
        } else if line == "  }" {
            in_block = false;
        }

        in_block
            && member
                .captures(line)
                .is_some_and(|captures| !keeps_member(model, datamodel, &captures[1]))
    });
    if dropped > 0 {
        tracing::debug!(model = %model.name, dropped, "dropped sdl members");
    }

    let query = Regex::new(r"^\s*type Query \{")?;
    let index = file
        .find_first(&query)
        .ok_or_else(|| RadminError::anchor("type Query", file.path()))?;

    let rendered = templates.render("sdl_page_query", &json!({ "model": names }))?;
    file.replace_line(index, rendered.lines().map(str::to_string).collect::<Vec<_>>());

    Ok(())
}

fn keeps_member(model: &Model, datamodel: &Datamodel, name: &str) -> bool {
    model.fields.iter().find(|field| field.name == name).is_some_and(|field| {
        !field.is_relation()
            || datamodel
                .model(&field.field_type)
                .is_ok_and(|target| !target.is_skipped())
    })
}

/// Add the paginated query to a service and make relation resolvers fail
/// loudly when a required relation is missing
///
/// # Errors
///
/// Returns an anchor error if the service does not import `db`, or a schema
/// error if no search field can be chosen.
pub fn patch_service(
    file: &mut SourceFile,
    model: &Model,
    names: &ModelNameVariants,
    templates: &TemplateRegistry,
    per_page: u32,
) -> Result<()> {
    let index = file
        .lines()
        .iter()
        .position(|line| line.trim() == DB_IMPORT)
        .ok_or_else(|| RadminError::anchor(DB_IMPORT, file.path()))?;

    let order_by = ["createdAt", "updatedAt"]
        .into_iter()
        .find(|name| model.fields.iter().any(|field| field.name == *name));

    let rendered = templates.render(
        "service_page",
        &json!({
            "model": names,
            "per_page": per_page,
            "search_field": find_search_field(model)?,
            "order_by": order_by,
        }),
    )?;
    file.insert(
        index + 1,
        rendered.trim_end_matches('\n').lines().map(str::to_string).collect::<Vec<_>>(),
    );

    file.replace_all(": (_obj, { root })", ": async (_obj, { root })");
    check_relations(file, model, names)?;

    Ok(())
}

fn check_relations(file: &mut SourceFile, model: &Model, names: &ModelNameVariants) -> Result<()> {
    let resolver = Regex::new(&format!(
        r"^\s*return (db\.{}\.findUnique\(\{{ where.*\)\.(\w+)\(\))\s*$",
        regex::escape(&names.camel)
    ))?;

    let matches: Vec<(usize, String, String)> = file
        .lines()
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let captures = resolver.captures(line)?;
            Some((index, captures[1].to_string(), captures[2].to_string()))
        })
        .collect();

    // Bottom-up so earlier indices stay valid
    for (index, call, relation) in matches.into_iter().rev() {
        let indent = file.line(index).map_or("", indent_of).to_string();
        let required = model
            .fields
            .iter()
            .any(|field| field.name == relation && field.is_required);

        let mut lines = vec![format!("{indent}const maybe = await {call}"), String::new()];
        if required {
            lines.extend([
                format!("{indent}if (!maybe) {{"),
                format!("{indent}  throw new Error('Could not resolve {relation}')"),
                format!("{indent}}}"),
                String::new(),
            ]);
        }
        lines.push(format!("{indent}return maybe"));

        file.replace_line(index, lines);
    }

    Ok(())
}
