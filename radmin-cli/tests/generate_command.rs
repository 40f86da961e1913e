//! Integration tests for the generate command

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use radmin::process::CommandRunner;
use radmin::scaffold::ModelNameVariants;
use radmin_cli_lib::GenerateCommand;
use tempfile::TempDir;

const SCHEMA: &str = "model Product {
  id    Int    @id @default(autoincrement())
  name  String
  price Float
}
";

const AUTH_FUNCTION: &str = "import { db } from 'src/lib/db'

export const handler = async (event, context) => {
  const loginOptions: DbAuthHandlerOptions['login'] = {
    handler: (user) => {
      return user
    },
  }

  const signupOptions = {
    handler: ({ username, hashedPassword, salt, userAttributes }) => {
      return db.user.create({
        data: {
          email: username,
          hashedPassword: hashedPassword,
          salt: salt,
          // name: userAttributes.name
        },
      })
    },
  }

  const authHandler = new DbAuthHandler(event, context, {
    db: db,
    authModelAccessor: 'user',
  })
}
";

const APP: &str = "import { RedwoodProvider } from '@redwoodjs/web'

import './index.css'

const App = () => <RedwoodProvider />

export default App
";

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

/// Records commands and writes the files `rw g sdl` would
#[derive(Clone, Default)]
struct Recorder {
    commands: Rc<RefCell<Vec<(PathBuf, String)>>>,
}

impl Recorder {
    fn commands(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|(_, command)| command.clone())
            .collect()
    }
}

impl CommandRunner for Recorder {
    fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> radmin::Result<()> {
        self.commands
            .borrow_mut()
            .push((cwd.to_path_buf(), format!("{program} {}", args.join(" "))));

        if let ["rw", "g", "sdl", "--no-tests", model] = args {
            let names = ModelNameVariants::new(model, "shop-admin");
            let plural = &names.camel_plural;
            fs::create_dir_all(cwd.join(format!("api/src/services/{plural}"))).unwrap();
            fs::write(
                cwd.join(format!("api/src/graphql/{plural}.sdl.ts")),
                format!("export const schema = gql`\n  type Query {{\n    {plural}: [{model}!]! @requireAuth\n  }}\n`\n"),
            )
            .unwrap();
            fs::write(
                cwd.join(format!("api/src/services/{plural}/{plural}.ts")),
                "import { db } from 'src/lib/db'\n",
            )
            .unwrap();
        }

        Ok(())
    }

    fn pipe(&self, _cwd: &Path, _program: &str, _args: &[&str], input: &str) -> radmin::Result<String> {
        Ok(input.to_string())
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project(dir: &TempDir, radmin_toml: &str) -> PathBuf {
    let root = dir.path().join("shop-admin");
    write(&root, "redwood.toml", "[web]\n  title = \"Redwood App\"\n");
    write(&root, "radmin.toml", radmin_toml);
    write(&root, "api/db/schema.prisma", SCHEMA);
    write(&root, "api/src/functions/auth.ts", AUTH_FUNCTION);
    write(
        &root,
        "api/src/lib/auth.ts",
        "export const getCurrentUser = async (session) => {\n  return await db.user.findUnique({ where: { id: session.id } })\n}\n",
    );
    write(&root, "web/src/App.tsx", APP);
    write(&root, "web/src/Routes.tsx", ROUTES);
    root
}

#[test]
fn test_full_run_wires_project() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir, "formatter = \"none\"\n");
    let recorder = Recorder::default();

    GenerateCommand::new(root.clone(), false)
        .with_runner(recorder.clone())
        .execute()
        .unwrap();

    let redwood_toml = fs::read_to_string(root.join("redwood.toml")).unwrap();
    assert!(redwood_toml.contains("title = \"shop-admin\""));

    assert!(root
        .join("web/src/pages/Radmin/Product/ProductsPage/ProductsPage.tsx")
        .is_file());
    assert!(root.join("web/src/components/radmin/Product/ProductForm.tsx").is_file());
    assert!(root.join("web/src/radmin.css").is_file());

    let app = fs::read_to_string(root.join("web/src/App.tsx")).unwrap();
    assert!(app.contains("import './radmin.css'\nimport './index.css'"));

    let routes = fs::read_to_string(root.join("web/src/Routes.tsx")).unwrap();
    assert!(routes.contains("name=\"radminProducts\""));

    let auth = fs::read_to_string(root.join("api/src/functions/auth.ts")).unwrap();
    assert!(auth.contains("if (!user.approved) {"));
    let auth_lib = fs::read_to_string(root.join("api/src/lib/auth.ts")).unwrap();
    assert!(auth_lib.contains("db.radminUser.findUnique"));

    let commands = recorder.commands();
    assert_eq!(commands.len(), 2);
    assert!(commands[0].starts_with("yarn workspace web add "));
    assert_eq!(commands[1], "yarn rw g sdl --no-tests Product");

    let service = fs::read_to_string(root.join("api/src/services/radmin/products/products.ts")).unwrap();
    assert!(service.contains("export const productPage"));
}

#[test]
fn test_rerun_keeps_single_route_region() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir, "formatter = \"none\"\ninstall_packages = false\n");

    for _ in 0..2 {
        GenerateCommand::new(root.clone(), false)
            .with_runner(Recorder::default())
            .execute()
            .unwrap();
    }

    let routes = fs::read_to_string(root.join("web/src/Routes.tsx")).unwrap();
    assert_eq!(routes.matches("<Set wrap={RadminLayout}>").count(), 1);
    let auth = fs::read_to_string(root.join("api/src/functions/auth.ts")).unwrap();
    assert_eq!(auth.matches("!user.approved").count(), 1);
}

#[test]
fn test_source_project_gets_auth_model() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("shop");
    write(&source, "redwood.toml", "[web]\n");
    write(&source, "api/db/schema.prisma", SCHEMA);
    write(&source, ".env", "DATABASE_URL=postgres://localhost/shop\n");

    let root = project(
        &dir,
        "source_project = \"../shop\"\nformatter = \"none\"\ninstall_packages = false\n",
    );
    let recorder = Recorder::default();

    GenerateCommand::new(root.clone(), false)
        .with_runner(recorder.clone())
        .execute()
        .unwrap();

    let source_schema = fs::read_to_string(source.join("api/db/schema.prisma")).unwrap();
    assert!(source_schema.contains("model RadminUser {"));
    assert_eq!(
        fs::read_to_string(root.join("api/db/schema.prisma")).unwrap(),
        source_schema
    );

    let env = fs::read_to_string(root.join(".env")).unwrap();
    assert!(env.contains("DATABASE_URL=postgres://localhost/shop"));

    let commands = recorder.commands.borrow();
    let migrate = commands
        .iter()
        .find(|(_, command)| command.contains("migrate"))
        .unwrap();
    assert_eq!(migrate.0, source.canonicalize().unwrap());
    assert_eq!(migrate.1, "yarn rw prisma migrate dev -n radminUser");
    assert!(commands.iter().any(|(_, command)| command == "yarn rw prisma generate"));

    // Pages for the auth model come from the copied schema
    assert!(root
        .join("web/src/pages/Radmin/RadminUser/RadminUsersPage/RadminUsersPage.tsx")
        .is_file());
}

#[test]
fn test_css_only_touches_styles() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir, "formatter = \"none\"\n");
    let recorder = Recorder::default();

    GenerateCommand::new(root.clone(), true)
        .with_runner(recorder.clone())
        .execute()
        .unwrap();

    assert!(root.join("web/src/radmin.css").is_file());
    let app = fs::read_to_string(root.join("web/src/App.tsx")).unwrap();
    assert!(app.contains("import './radmin.css'"));

    assert!(!root.join("web/src/pages/Radmin").exists());
    assert!(recorder.commands().is_empty());
    let redwood_toml = fs::read_to_string(root.join("redwood.toml")).unwrap();
    assert!(redwood_toml.contains("Redwood App"));
}

#[test]
fn test_missing_project_fails() {
    let dir = TempDir::new().unwrap();
    let err = GenerateCommand::new(dir.path().join("nowhere"), false)
        .with_runner(Recorder::default())
        .execute()
        .unwrap_err();

    assert!(err.to_string().contains("Failed to open project"));
}
