//! dbAuth wiring
//!
//! The admin panel authenticates against its own `RadminUser` table. New
//! accounts start unapproved and cannot log in until an existing admin flips
//! `approved`.

use regex::Regex;

use super::{indent_of, SourceFile};
use crate::error::{RadminError, Result};
use crate::scaffold::AUTH_MODEL;

/// Auth function, relative to the project root
pub const AUTH_FUNCTION_PATH: &str = "api/src/functions/auth.ts";

/// Auth library, relative to the project root
pub const AUTH_LIB_PATH: &str = "api/src/lib/auth.ts";

/// Model appended to the source schema
pub const AUTH_MODEL_SCHEMA: &str = "
model RadminUser {
  id                  Int       @id @default(autoincrement())
  email               String    @unique
  hashedPassword      String
  salt                String
  resetToken          String?
  resetTokenExpiresAt DateTime?
  approved            Boolean   @default(false)
}
";

const APPROVED_CHECK: &str = "!user.approved";

/// Append the auth model to a schema that lacks it
///
/// Returns whether the schema changed; a migration is only needed then.
///
/// # Errors
///
/// Returns a pattern error if the model lookup pattern fails to compile.
pub fn append_auth_model(schema: &mut SourceFile) -> Result<bool> {
    let declared = Regex::new(&format!(r"^\s*model\s+{AUTH_MODEL}\s*\{{"))?;
    if schema.find_first(&declared).is_some() {
        return Ok(false);
    }

    schema.append(AUTH_MODEL_SCHEMA.lines());
    tracing::info!(path = %schema.path().display(), "added {AUTH_MODEL} model");
    Ok(true)
}

/// Point the dbAuth handler at the auth model and require approval on login
///
/// # Errors
///
/// Returns an anchor error if the login options or their `return user` line
/// cannot be found.
pub fn patch_auth_function(file: &mut SourceFile) -> Result<()> {
    file.replace_all("salt, userAttributes", "salt");
    file.replace_all("db.user.create", "db.radminUser.create");
    file.replace_all("authModelAccessor: 'user',", "authModelAccessor: 'radminUser',");

    let name_comment = Regex::new(r"^\s*// name: userAttributes\.name")?;
    file.remove_lines(|line| name_comment.is_match(line));

    if file.contains(APPROVED_CHECK) {
        return Ok(());
    }

    // The forgot-password handler has the same `return user`, so start from
    // the login options.
    let login_options = Regex::new(r"const loginOptions.*= \{")?;
    let return_user = Regex::new(r"^\s*return user\s*$")?;

    let start = file
        .find_first(&login_options)
        .ok_or_else(|| RadminError::anchor("the dbAuth login options", file.path()))?;
    let index = file
        .find_first_from(start, &return_user)
        .ok_or_else(|| RadminError::anchor("the login handler's `return user`", file.path()))?;

    let indent = file.line(index).map_or("", indent_of).to_string();
    file.replace_line(
        index,
        [
            format!("{indent}if ({APPROVED_CHECK}) {{"),
            format!("{indent}  throw new Error('You are not approved yet')"),
            format!("{indent}}}"),
            String::new(),
            format!("{indent}return user"),
        ],
    );

    Ok(())
}

/// Make `getCurrentUser` read from the auth model
pub fn patch_auth_lib(file: &mut SourceFile) {
    file.replace_all("db.user.findUnique", "db.radminUser.findUnique");
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_FUNCTION: &str = "import { db } from 'src/lib/db'

export const handler = async (event, context) => {
  const forgotPasswordOptions = {
    handler: (user) => {
      return user
    },
  }

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

    fn patched() -> String {
        let mut file = SourceFile::new(AUTH_FUNCTION_PATH, AUTH_FUNCTION);
        patch_auth_function(&mut file).unwrap();
        file.text()
    }

    #[test]
    fn test_auth_function_uses_radmin_user() {
        let out = patched();
        assert!(out.contains("db.radminUser.create"));
        assert!(out.contains("authModelAccessor: 'radminUser',"));
        assert!(out.contains("({ username, hashedPassword, salt })"));
        assert!(!out.contains("userAttributes"));
    }

    #[test]
    fn test_approval_check_only_in_login_handler() {
        let out = patched();
        assert_eq!(out.matches("!user.approved").count(), 1);
        assert!(out.contains(
            "  const loginOptions: DbAuthHandlerOptions['login'] = {\n    handler: (user) => {\n      if (!user.approved) {\n        throw new Error('You are not approved yet')\n      }\n\n      return user\n"
        ));
        assert!(out.contains("  const forgotPasswordOptions = {\n    handler: (user) => {\n      return user\n"));
    }

    #[test]
    fn test_auth_function_patch_is_idempotent() {
        let once = patched();
        let mut file = SourceFile::new(AUTH_FUNCTION_PATH, &once);
        patch_auth_function(&mut file).unwrap();
        assert_eq!(file.text(), once);
    }

    #[test]
    fn test_missing_login_options_is_anchor_error() {
        let mut file = SourceFile::new(AUTH_FUNCTION_PATH, "export const handler = () => {}\n");
        let err = patch_auth_function(&mut file).unwrap_err();
        assert!(matches!(err, RadminError::Anchor { .. }));
    }

    #[test]
    fn test_auth_lib() {
        let mut file = SourceFile::new(
            AUTH_LIB_PATH,
            "return await db.user.findUnique({ where: { id: session.id } })\n",
        );
        patch_auth_lib(&mut file);
        assert!(file.text().contains("db.radminUser.findUnique"));
    }

    #[test]
    fn test_auth_model_appended_once() {
        let mut schema = SourceFile::new("schema.prisma", "model Post {\n  id Int @id\n}\n");
        assert!(append_auth_model(&mut schema).unwrap());
        let once = schema.text();
        assert!(once.contains("model RadminUser {\n  id                  Int       @id @default(autoincrement())"));
        assert!(once.ends_with("}\n"));

        let parsed = crate::schema::parse_schema(&once).unwrap();
        assert!(parsed.model(AUTH_MODEL).unwrap().field("approved").is_ok());

        let mut schema = SourceFile::new("schema.prisma", &once);
        assert!(!append_auth_model(&mut schema).unwrap());
        assert!(!schema.is_changed());
    }
}
