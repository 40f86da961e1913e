//! Integration tests running the library pipeline against a Redwood project
//! on disk

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use radmin::error::Result;
use radmin::format::Passthrough;
use radmin::patch::routes::ROUTES_PATH;
use radmin::patch::{patch_routes, ModelRoutes};
use radmin::process::CommandRunner;
use radmin::scaffold::{AdminGenerator, ModelNameVariants};
use radmin::schema::parse_schema_file;
use radmin::sdl::SdlGenerator;
use radmin::{ProjectLayout, RadminConfig};
use tempfile::TempDir;

const SCHEMA: &str = r#"datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

generator client {
  provider = "prisma-client-js"
}

enum Status {
  DRAFT
  PUBLISHED
}

model Post {
  id        Int      @id @default(autoincrement())
  title     String
  /// @radmin-multiline
  body      String
  status    Status
  published Boolean  @default(false)
  author    User     @relation(fields: [authorId], references: [id])
  authorId  Int
  createdAt DateTime @default(now())
}

model User {
  id    Int    @id @default(autoincrement())
  email String @unique
  name  String
  posts Post[]
}

/// @radmin skip
model Session {
  id    String @id
  token String
}
"#;

const ROUTES: &str = "import { Router, Route } from '@redwoodjs/router'

const Routes = () => {
  return (
    <Router>
      <Route notfound page={NotFoundPage} />
    </Router>
  )
}

export default Routes
";

/// Writes what `rw g sdl <Model>` would, and records every command
#[derive(Default)]
struct FakeRedwood {
    commands: RefCell<Vec<String>>,
}

impl CommandRunner for FakeRedwood {
    fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<()> {
        self.commands
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));

        if let ["rw", "g", "sdl", "--no-tests", model] = args {
            let names = ModelNameVariants::new(model, "admin");
            let graphql = cwd.join("api/src/graphql");
            let services = cwd.join("api/src/services").join(&names.camel_plural);
            fs::create_dir_all(&graphql).unwrap();
            fs::create_dir_all(&services).unwrap();

            fs::write(
                graphql.join(format!("{}.sdl.ts", names.camel_plural)),
                format!(
                    "export const schema = gql`\n  type {model} {{\n    id: Int!\n    extra: String\n  }}\n\n  type Query {{\n    {}: [{model}!]! @requireAuth\n  }}\n`\n",
                    names.camel_plural
                ),
            )
            .unwrap();
            fs::write(
                services.join(format!("{}.ts", names.camel_plural)),
                format!(
                    "import {{ db }} from 'src/lib/db'\n\nexport const {0} = () => {{\n  return db.{1}.findMany()\n}}\n",
                    names.camel_plural, names.camel
                ),
            )
            .unwrap();
        }

        Ok(())
    }

    fn pipe(&self, _cwd: &Path, _program: &str, _args: &[&str], input: &str) -> Result<String> {
        Ok(input.to_string())
    }
}

fn project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("admin");

    for sub in ["api/db", "api/src/services/posts", "web/src"] {
        fs::create_dir_all(root.join(sub)).unwrap();
    }
    fs::write(root.join("redwood.toml"), "[web]\n  title = \"Redwood App\"\n").unwrap();
    fs::write(root.join("api/db/schema.prisma"), SCHEMA).unwrap();
    fs::write(root.join("api/src/services/posts/posts.ts"), "// own service\n").unwrap();
    fs::write(root.join(ROUTES_PATH), ROUTES).unwrap();

    (dir, root)
}

#[test]
fn test_generated_pages_cover_every_admin_model() {
    let (_dir, root) = project();
    let layout = ProjectLayout::open(&root).unwrap();
    let schema = parse_schema_file(&layout.schema_path()).unwrap();

    let generator = AdminGenerator::new(&schema, layout.app_name().unwrap(), 10).unwrap();
    for file in generator.generate().unwrap() {
        layout.write_generated(&file, &Passthrough).unwrap();
    }

    let pages = root.join("web/src/pages/Radmin");
    assert!(pages.join("Post/PostsPage/PostsPage.tsx").is_file());
    assert!(pages.join("User/EditUserPage/EditUserPage.tsx").is_file());
    assert!(!pages.join("Session").exists());

    let form = fs::read_to_string(root.join("web/src/components/radmin/Post/PostForm.tsx")).unwrap();
    assert!(form.contains("<WysiwygEditor"));
    assert!(form.contains("CheckboxField"));
    assert!(form.contains("RadioField"));

    let layout_file = fs::read_to_string(root.join("web/src/layouts/RadminLayout/RadminLayout.tsx")).unwrap();
    assert!(layout_file.contains("routes.radminPosts()"));
    assert!(!layout_file.contains("Session"));
}

#[test]
fn test_routes_written_once_across_runs() {
    let (_dir, root) = project();
    let layout = ProjectLayout::open(&root).unwrap();
    let schema = parse_schema_file(&layout.schema_path()).unwrap();
    let app_name = layout.app_name().unwrap();

    let routes: Vec<ModelRoutes> = schema
        .admin_models()
        .map(|model| ModelRoutes::new(model, &app_name).unwrap())
        .collect();

    for _ in 0..2 {
        let mut file = layout.read(ROUTES_PATH, "routes").unwrap();
        patch_routes(&mut file, &routes).unwrap();
        file.write().unwrap();
    }

    let written = fs::read_to_string(root.join(ROUTES_PATH)).unwrap();
    assert_eq!(written.matches("<Set wrap={RadminLayout}>").count(), 1);
    assert_eq!(written.matches("import RadminLayout").count(), 1);
    assert!(written.contains("import { Router, Route, Set, Private } from '@redwoodjs/router'"));
    assert!(written.contains("<Route path=\"/radmin/posts/{id:Int}/edit\" page={RadminPostEditPostPage} name=\"radminEditPost\" />"));
    assert!(!written.contains("radminSession"));
}

#[test]
fn test_sdl_generation_keeps_own_services() {
    let (_dir, root) = project();
    let layout = ProjectLayout::open(&root).unwrap();
    let schema = parse_schema_file(&layout.schema_path()).unwrap();
    let config = RadminConfig {
        formatter: radmin::format::FormatterKind::None,
        ..RadminConfig::default()
    };
    let runner = FakeRedwood::default();

    let models: Vec<_> = schema.admin_models().collect();
    let sdl = SdlGenerator::new(&layout, &schema, &runner, &config).unwrap();
    let mut done = Vec::new();
    sdl.generate_all(&models, |model| done.push(model.name.clone()))
        .unwrap();

    assert_eq!(done, ["Post", "User"]);
    assert_eq!(
        runner.commands.borrow().as_slice(),
        ["yarn rw g sdl --no-tests Post", "yarn rw g sdl --no-tests User"]
    );

    let services = root.join("api/src/services");
    assert_eq!(fs::read_to_string(services.join("posts/posts.ts")).unwrap(), "// own service\n");

    let service = fs::read_to_string(services.join("radmin/posts/posts.ts")).unwrap();
    assert!(service.contains("export const postPage = async"));

    let sdl = fs::read_to_string(root.join("api/src/graphql/radmin/users.sdl.ts")).unwrap();
    assert!(sdl.contains("userPage(page: Int, q: String): UserPage @requireAuth"));
    assert!(!sdl.contains("extra"));
}

#[test]
fn test_failed_sdl_generation_restores_directories() {
    struct Failing;

    impl CommandRunner for Failing {
        fn run(&self, _cwd: &Path, program: &str, args: &[&str]) -> Result<()> {
            Err(radmin::RadminError::Process {
                command: format!("{program} {}", args.join(" ")),
                reason: "exit status: 1".to_string(),
            })
        }

        fn pipe(&self, _cwd: &Path, _program: &str, _args: &[&str], input: &str) -> Result<String> {
            Ok(input.to_string())
        }
    }

    let (_dir, root) = project();
    let layout = ProjectLayout::open(&root).unwrap();
    let schema = parse_schema_file(&layout.schema_path()).unwrap();
    let config = RadminConfig::default();

    let models: Vec<_> = schema.admin_models().collect();
    let sdl = SdlGenerator::new(&layout, &schema, &Failing, &config).unwrap();
    let err = sdl.generate_all(&models, |_| {}).unwrap_err();

    assert!(matches!(err, radmin::RadminError::Process { .. }));
    assert!(root.join("api/src/services/posts/posts.ts").is_file());
    let leftovers = fs::read_dir(root.join("api/src"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains('_'))
        .count();
    assert_eq!(leftovers, 0);
}
