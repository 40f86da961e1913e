//! Admin panel generation command
//!
//! Runs the whole pipeline against one Redwood project:
//! - app title, auth model and database wiring
//! - pages, components, layout, styles and formatters
//! - routes and web packages
//! - SDLs and services with paginated search
//!
//! # Example
//!
//! ```bash
//! radmin ../store-admin
//! radmin ../store-admin --css
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use radmin::format::{formatter_for, SourceFormatter};
use radmin::patch::app::{APP_PATH, ENV_PATH, REDWOOD_TOML_PATH};
use radmin::patch::auth::{AUTH_FUNCTION_PATH, AUTH_LIB_PATH};
use radmin::patch::routes::ROUTES_PATH;
use radmin::patch::{
    append_auth_model, copy_database_url, patch_app_styles, patch_auth_function, patch_auth_lib,
    patch_redwood_title, patch_routes, ModelRoutes, SourceFile,
};
use radmin::process::{CommandRunner, SystemRunner};
use radmin::scaffold::assets::WEB_PACKAGES;
use radmin::scaffold::generator::{COMPONENTS_DIR, PAGES_DIR};
use radmin::scaffold::{AdminGenerator, GeneratedFile};
use radmin::schema::parse_schema_file;
use radmin::sdl::SdlGenerator;
use radmin::{ProjectLayout, RadminConfig};

/// Generate the admin panel for a Redwood project
pub struct GenerateCommand {
    project_path: PathBuf,
    css_only: bool,
    runner: Box<dyn CommandRunner>,
}

impl GenerateCommand {
    /// Create a command for the project at `project_path`
    ///
    /// With `css_only`, only the stylesheet and its import are written.
    #[must_use]
    pub fn new(project_path: PathBuf, css_only: bool) -> Self {
        Self {
            project_path,
            css_only,
            runner: Box::new(SystemRunner),
        }
    }

    /// Run external commands through `runner` instead of spawning them
    #[must_use]
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Fails on the first step that fails; files written by earlier steps
    /// are left in place.
    pub fn execute(&self) -> Result<()> {
        let layout = ProjectLayout::open(&self.project_path)
            .with_context(|| format!("Failed to open project {}", self.project_path.display()))?;
        let config = RadminConfig::load(layout.root()).context("Failed to load configuration")?;
        let runner = self.runner.as_ref();
        let formatter = formatter_for(config.formatter, runner, &config.package_manager, layout.root());

        if self.css_only {
            return self.write_styles(&layout, formatter.as_ref());
        }

        let app_name = layout.app_name()?;
        println!(
            "\n{} {} {}",
            style("Generating admin panel for").cyan().bold(),
            style(&app_name).green().bold(),
            style("...").cyan().bold()
        );

        let mut redwood_toml = layout.read(REDWOOD_TOML_PATH, "redwood.toml")?;
        patch_redwood_title(&mut redwood_toml, &app_name).context("Failed to set the app title")?;
        write_patched(&redwood_toml, "app title")?;

        layout.reset_dir(PAGES_DIR).context("Failed to reset the pages directory")?;

        if let Some(source) = &config.source_project {
            self.sync_source_project(&layout, source, &config)?;
        }

        let mut auth_function = layout.read(AUTH_FUNCTION_PATH, "the dbAuth function")?;
        patch_auth_function(&mut auth_function).context("Failed to patch the auth function")?;
        write_patched(&auth_function, "approval check")?;

        let mut auth_lib = layout.read(AUTH_LIB_PATH, "the auth library")?;
        patch_auth_lib(&mut auth_lib);
        write_patched(&auth_lib, "current user lookup")?;

        let schema = parse_schema_file(&layout.schema_path()).context("Failed to parse the Prisma schema")?;
        let generator = AdminGenerator::new(&schema, app_name.as_str(), config.per_page)
            .context("Failed to create the admin generator")?;
        let files = generator.generate().context("Failed to generate admin pages")?;

        layout
            .reset_dir(COMPONENTS_DIR)
            .context("Failed to reset the components directory")?;

        println!(
            "\n{} {} files for {} models:",
            style("Generated").green().bold(),
            files.len(),
            generator.models().len()
        );
        for file in &files {
            write_generated(&layout, file, formatter.as_ref())?;
        }

        let mut app = layout.read(APP_PATH, "the App component")?;
        patch_app_styles(&mut app).context("Failed to import the admin styles")?;
        write_patched(&app, "admin styles import")?;

        let routes = generator
            .models()
            .iter()
            .map(|model| ModelRoutes::new(model, &app_name))
            .collect::<radmin::Result<Vec<_>>>()
            .context("Failed to build model routes")?;
        let mut routes_file = layout.read(ROUTES_PATH, "the Routes component")?;
        patch_routes(&mut routes_file, &routes).context("Failed to patch routes")?;
        routes_file.format_with(formatter.as_ref())?;
        write_patched(&routes_file, "admin routes")?;

        if config.install_packages {
            let mut args = vec!["workspace", "web", "add"];
            args.extend_from_slice(WEB_PACKAGES);
            self.run_step(&layout, &config.package_manager, &args, "Installing web packages...")?;
        }

        let sdl = SdlGenerator::new(&layout, &schema, runner, &config)
            .context("Failed to create the SDL generator")?;
        let spinner = spinner("Generating SDLs and services...")?;
        let result = sdl.generate_all(generator.models(), |model| {
            spinner.println(format!(
                "  {} {} ({})",
                style("✓").green(),
                style(format!("api/src/services/radmin/{}", model.name)).dim(),
                style("SDL and service").dim()
            ));
        });
        spinner.finish_and_clear();
        result.context("Failed to generate SDLs and services")?;

        println!(
            "\n{} Admin panel for {} is ready!",
            style("✨").green().bold(),
            style(&app_name).green().bold()
        );
        self.print_next_steps(&config);

        Ok(())
    }

    /// Add the auth model to the source project, copy its schema and
    /// database URL, and regenerate the Prisma client
    fn sync_source_project(&self, layout: &ProjectLayout, source: &Path, config: &RadminConfig) -> Result<()> {
        let source = ProjectLayout::open(source).context("Failed to open the source project")?;
        let pm = config.package_manager.as_str();

        let mut schema = SourceFile::read(&source.schema_path(), "the source schema")?;
        if append_auth_model(&mut schema)? {
            write_patched(&schema, "auth model")?;
            self.run_step(
                &source,
                pm,
                &["rw", "prisma", "migrate", "dev", "-n", "radminUser"],
                "Migrating the source database...",
            )?;
        }

        let target = layout.schema_path();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::copy(source.schema_path(), &target)
            .with_context(|| format!("Failed to copy the schema to {}", target.display()))?;
        print_written(&target, "schema from source project");

        self.run_step(layout, pm, &["rw", "prisma", "generate"], "Generating the Prisma client...")?;

        let source_env = SourceFile::read(&source.path(ENV_PATH), "the source .env")?;
        let mut env = SourceFile::read_or_empty(&layout.path(ENV_PATH))?;
        if copy_database_url(&source_env, &mut env)? {
            write_patched(&env, "database URL")?;
        }

        Ok(())
    }

    fn write_styles(&self, layout: &ProjectLayout, formatter: &dyn SourceFormatter) -> Result<()> {
        write_generated(layout, &AdminGenerator::generate_styles(), formatter)?;

        let mut app = layout.read(APP_PATH, "the App component")?;
        patch_app_styles(&mut app).context("Failed to import the admin styles")?;
        write_patched(&app, "admin styles import")?;

        println!(
            "\n{} Styles for {} are up to date",
            style("✨").green().bold(),
            style(self.project_path.display()).green().bold()
        );
        Ok(())
    }

    fn run_step(&self, layout: &ProjectLayout, program: &str, args: &[&str], message: &'static str) -> Result<()> {
        let spinner = spinner(message)?;
        let result = self.runner.run(layout.root(), program, args);
        spinner.finish_and_clear();

        result.with_context(|| format!("Failed to run `{program} {}`", args.join(" ")))?;
        println!("  {} {} {}", style("✓").green(), program, style(args.join(" ")).dim());
        Ok(())
    }

    fn print_next_steps(&self, config: &RadminConfig) {
        println!("\n{}", style("Next steps:").cyan().bold());
        println!(
            "  1. Start the dev server: {}",
            style(format!("cd {} && {} rw dev", self.project_path.display(), config.package_manager)).yellow()
        );
        println!("  2. Sign up at {}", style("http://localhost:8910/radminSignup").yellow());
        println!(
            "  3. Approve the account: set {} on its RadminUser row",
            style("approved = true").yellow()
        );
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}

fn write_generated(layout: &ProjectLayout, file: &GeneratedFile, formatter: &dyn SourceFormatter) -> Result<()> {
    layout
        .write_generated(file, formatter)
        .with_context(|| format!("Failed to write file: {}", file.path.display()))?;
    print_written(&file.path, &file.description);
    Ok(())
}

fn write_patched(file: &SourceFile, description: &str) -> Result<()> {
    if file
        .write()
        .with_context(|| format!("Failed to write file: {}", file.path().display()))?
    {
        print_written(file.path(), description);
    }
    Ok(())
}

fn print_written(path: &Path, description: &str) {
    println!(
        "  {} {} ({})",
        style("✓").green(),
        style(path.display()).dim(),
        style(description).dim()
    );
}
