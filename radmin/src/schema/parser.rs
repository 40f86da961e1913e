//! Line-oriented parser for `schema.prisma`
//!
//! Understands the subset of the Prisma schema language the generator needs:
//! `model`, `enum` and composite `type` blocks, field types with `?` / `[]`
//! modifiers, the `@id`, `@unique`, `@updatedAt` and `@default(..)`
//! attributes, and `///` documentation comments, either on the lines above a
//! field or trailing it. `datasource`, `generator` and `view` blocks are
//! skipped.

use super::model::{Datamodel, Enum, Field, FieldDefault, FieldKind, Model, SCALAR_TYPES};
use crate::error::{RadminError, Result};

/// A field before its type has been resolved against the whole schema
struct RawField {
    field: Field,
    line: usize,
}

struct RawModel {
    name: String,
    fields: Vec<RawField>,
    documentation: Option<String>,
}

enum Block {
    Model(RawModel),
    Composite(RawModel),
    Enum(Enum),
    Ignored,
}

/// Parse the contents of a `schema.prisma` file
///
/// # Errors
///
/// Returns [`RadminError::SchemaParse`] on malformed input or when a field
/// refers to a type that is neither a scalar, an enum nor a model.
///
/// # Examples
///
/// ```
/// let schema = radmin::schema::parse_schema(r#"
///     model Post {
///       id    Int    @id @default(autoincrement())
///       title String
///     }
/// "#).unwrap();
/// assert_eq!(schema.models[0].fields[1].name, "title");
/// ```
pub fn parse_schema(source: &str) -> Result<Datamodel> {
    let mut models = Vec::new();
    let mut types = Vec::new();
    let mut enums = Vec::new();
    let mut current: Option<(Block, usize)> = None;
    let mut docs: Vec<String> = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();

        if let Some(doc) = trimmed.strip_prefix("///") {
            docs.push(doc.trim().to_string());
            continue;
        }

        let (code, comment) = split_comment(trimmed);
        let line = code.trim();
        if line.is_empty() {
            continue;
        }

        match current.take() {
            None => {
                current = Some((open_block(line, line_no, take_docs(&mut docs))?, line_no));
            }
            Some((block, start)) if line == "}" => {
                docs.clear();
                match block {
                    Block::Model(model) => models.push(model),
                    Block::Composite(composite) => types.push(composite),
                    Block::Enum(e) => enums.push(e),
                    Block::Ignored => {}
                }
                tracing::trace!(start, end = line_no, "closed block");
            }
            Some((mut block, start)) => {
                if let Some(doc) = comment.and_then(|c| c.strip_prefix('/')) {
                    docs.push(doc.trim().to_string());
                }
                let documentation = take_docs(&mut docs);
                match &mut block {
                    Block::Model(model) | Block::Composite(model) => {
                        if !line.starts_with("@@") {
                            model.fields.push(RawField {
                                field: parse_field(line, line_no, documentation)?,
                                line: line_no,
                            });
                        }
                    }
                    Block::Enum(e) => {
                        if !line.starts_with("@@") {
                            let value = line.split_whitespace().next().unwrap_or_default();
                            e.values.push(value.to_string());
                        }
                    }
                    Block::Ignored => {}
                }
                current = Some((block, start));
            }
        }
    }

    if let Some((_, start)) = current {
        return Err(RadminError::SchemaParse {
            line: start,
            message: "block is never closed".to_string(),
        });
    }

    resolve(models, types, enums)
}

fn take_docs(docs: &mut Vec<String>) -> Option<String> {
    if docs.is_empty() {
        None
    } else {
        Some(std::mem::take(docs).join("\n"))
    }
}

fn open_block(line: &str, line_no: usize, documentation: Option<String>) -> Result<Block> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();

    if !line.ends_with('{') || name.is_empty() || name == "{" {
        return Err(RadminError::SchemaParse {
            line: line_no,
            message: format!("expected a block declaration, found `{line}`"),
        });
    }

    let name = name.trim_end_matches('{').to_string();

    Ok(match keyword {
        "model" => Block::Model(RawModel {
            name,
            fields: Vec::new(),
            documentation,
        }),
        "enum" => Block::Enum(Enum {
            name,
            values: Vec::new(),
            documentation,
        }),
        "type" => Block::Composite(RawModel {
            name,
            fields: Vec::new(),
            documentation,
        }),
        "datasource" | "generator" | "view" => Block::Ignored,
        other => {
            return Err(RadminError::SchemaParse {
                line: line_no,
                message: format!("unknown block type `{other}`"),
            })
        }
    })
}

/// Split a line at a trailing `//` comment that is not inside a string
/// literal, returning the code and the comment text after `//`
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], Some(&line[i + 2..]));
            }
            _ => {}
        }
    }

    (line, None)
}

fn parse_field(line: &str, line_no: usize, documentation: Option<String>) -> Result<Field> {
    let (name, rest) = split_token(line);
    let (type_token, attributes) = split_token(rest);

    if name.is_empty() || type_token.is_empty() {
        return Err(RadminError::SchemaParse {
            line: line_no,
            message: format!("expected `name Type`, found `{line}`"),
        });
    }

    let (field_type, is_required, is_list) = if let Some(base) = type_token.strip_suffix("[]") {
        (base, true, true)
    } else if let Some(base) = type_token.strip_suffix('?') {
        (base, false, false)
    } else {
        (type_token, true, false)
    };

    // Unsupported("...") keeps only the type constructor name
    let field_type = field_type.split('(').next().unwrap_or(field_type);

    let mut field = Field {
        name: name.to_string(),
        field_type: field_type.to_string(),
        kind: FieldKind::Scalar,
        is_required,
        is_list,
        is_unique: false,
        is_id: false,
        is_updated_at: false,
        default: None,
        documentation,
    };

    for (attribute, args) in parse_attributes(attributes, line_no)? {
        match attribute {
            "id" => field.is_id = true,
            "unique" => field.is_unique = true,
            "updatedAt" => field.is_updated_at = true,
            "default" => field.default = Some(parse_default(args.unwrap_or_default())),
            _ => {}
        }
    }

    Ok(field)
}

/// Split off the first whitespace-delimited token, keeping parenthesized
/// arguments (`Unsupported("point")`) attached to it
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    let mut depth = 0usize;
    let mut in_string = false;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 && !in_string => {
                return (&input[..i], input[i..].trim_start());
            }
            _ => {}
        }
    }

    (input, "")
}

/// Parse `@name(args) @other` into `(name, args)` pairs
fn parse_attributes(input: &str, line_no: usize) -> Result<Vec<(&str, Option<&str>)>> {
    let mut attributes = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let Some(after_at) = rest.strip_prefix('@') else {
            return Err(RadminError::SchemaParse {
                line: line_no,
                message: format!("unexpected `{rest}`"),
            });
        };

        let name_end = after_at
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(after_at.len());
        let name = &after_at[..name_end];
        let after_name = &after_at[name_end..];

        if let Some(args_start) = after_name.strip_prefix('(') {
            let close = matching_paren(args_start).ok_or_else(|| RadminError::SchemaParse {
                line: line_no,
                message: format!("unbalanced parentheses in `@{name}`"),
            })?;
            attributes.push((name, Some(args_start[..close].trim())));
            rest = args_start[close + 1..].trim_start();
        } else {
            attributes.push((name, None));
            rest = after_name.trim_start();
        }
    }

    Ok(attributes)
}

/// Index of the `)` closing an argument list whose `(` was just consumed
fn matching_paren(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

fn parse_default(args: &str) -> FieldDefault {
    // Named arguments (`map: "..."`) follow the value
    let value = first_argument(args).trim();

    if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return FieldDefault::String(inner.replace("\\\"", "\""));
    }

    match value {
        "true" => return FieldDefault::Boolean(true),
        "false" => return FieldDefault::Boolean(false),
        _ => {}
    }

    if value.parse::<f64>().is_ok() {
        return FieldDefault::Number(value.to_string());
    }

    if let Some(open) = value.find('(') {
        if value.ends_with(')') {
            return FieldDefault::Function {
                name: value[..open].trim().to_string(),
            };
        }
    }

    if !value.is_empty() && value.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return FieldDefault::EnumValue(value.to_string());
    }

    FieldDefault::Other(value.to_string())
}

fn first_argument(args: &str) -> &str {
    let mut depth = 0usize;
    let mut in_string = false;

    for (i, c) in args.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => return &args[..i],
            _ => {}
        }
    }

    args
}

fn resolve(raw_models: Vec<RawModel>, raw_types: Vec<RawModel>, enums: Vec<Enum>) -> Result<Datamodel> {
    let model_names: Vec<String> = raw_models.iter().map(|m| m.name.clone()).collect();
    let type_names: Vec<String> = raw_types.iter().map(|t| t.name.clone()).collect();

    let resolve_block = |raw: RawModel, allow_relations: bool| -> Result<Model> {
        let mut fields = Vec::with_capacity(raw.fields.len());

        for RawField { mut field, line } in raw.fields {
            field.kind = if SCALAR_TYPES.contains(&field.field_type.as_str()) {
                FieldKind::Scalar
            } else if enums.iter().any(|e| e.name == field.field_type) {
                FieldKind::Enum
            } else if type_names.contains(&field.field_type) {
                FieldKind::Composite
            } else if allow_relations && model_names.contains(&field.field_type) {
                FieldKind::Object
            } else {
                return Err(RadminError::SchemaParse {
                    line,
                    message: format!(
                        "field `{}.{}` has unknown type `{}`",
                        raw.name, field.name, field.field_type
                    ),
                });
            };
            fields.push(field);
        }

        Ok(Model {
            name: raw.name,
            fields,
            documentation: raw.documentation,
        })
    };

    // Composite types cannot point at models
    let types = raw_types
        .into_iter()
        .map(|raw| resolve_block(raw, false))
        .collect::<Result<Vec<_>>>()?;
    let models = raw_models
        .into_iter()
        .map(|raw| resolve_block(raw, true))
        .collect::<Result<Vec<_>>>()?;

    Ok(Datamodel { models, enums, types })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

generator client {
  provider      = "prisma-client-js"
  binaryTargets = "native"
}

/// Blog posts
model Post {
  id        Int      @id @default(autoincrement())
  title     String   @unique
  /// @radmin-multiline
  /// Shown on the front page
  body      String
  status    Status   @default(DRAFT)
  tags      Tag[]
  url       String?  @default("https://example.com") // canonical link
  author    User     @relation(fields: [authorId], references: [id])
  authorId  Int
  createdAt DateTime @default(now())
  updatedAt DateTime @updatedAt
  rating    Float    @default(4.5)
  featured  Boolean  @default(false)

  @@index([authorId])
}

model User {
  id    String @id @default(cuid())
  email String @unique
  posts Post[]
}

enum Status {
  DRAFT
  PUBLISHED @map("published")
}

enum Tag {
  NEWS
  TECH
}
"#;

    #[test]
    fn test_parses_models_and_enums() {
        let schema = parse_schema(BLOG).unwrap();
        assert_eq!(schema.models.len(), 2);
        assert_eq!(schema.enums.len(), 2);
        assert_eq!(schema.enums[0].values, ["DRAFT", "PUBLISHED"]);
        assert_eq!(schema.models[0].documentation.as_deref(), Some("Blog posts"));
    }

    #[test]
    fn test_field_modifiers_and_attributes() {
        let schema = parse_schema(BLOG).unwrap();
        let post = schema.model("Post").unwrap();

        let id = post.field("id").unwrap();
        assert!(id.is_id);
        assert_eq!(
            id.default,
            Some(FieldDefault::Function {
                name: "autoincrement".to_string()
            })
        );

        assert!(post.field("title").unwrap().is_unique);
        assert!(!post.field("url").unwrap().is_required);
        assert!(post.field("tags").unwrap().is_list);
        assert!(post.field("updatedAt").unwrap().is_updated_at);
    }

    #[test]
    fn test_field_kinds() {
        let schema = parse_schema(BLOG).unwrap();
        let post = schema.model("Post").unwrap();
        assert_eq!(post.field("status").unwrap().kind, FieldKind::Enum);
        assert_eq!(post.field("tags").unwrap().kind, FieldKind::Enum);
        assert_eq!(post.field("author").unwrap().kind, FieldKind::Object);
        assert_eq!(post.field("authorId").unwrap().kind, FieldKind::Scalar);
    }

    #[test]
    fn test_defaults() {
        let schema = parse_schema(BLOG).unwrap();
        let post = schema.model("Post").unwrap();
        assert_eq!(
            post.field("url").unwrap().default,
            Some(FieldDefault::String("https://example.com".to_string()))
        );
        assert_eq!(
            post.field("status").unwrap().default,
            Some(FieldDefault::EnumValue("DRAFT".to_string()))
        );
        assert_eq!(
            post.field("rating").unwrap().default,
            Some(FieldDefault::Number("4.5".to_string()))
        );
        assert_eq!(
            post.field("featured").unwrap().default,
            Some(FieldDefault::Boolean(false))
        );
    }

    #[test]
    fn test_field_documentation_joins_lines() {
        let schema = parse_schema(BLOG).unwrap();
        let body = schema.model("Post").unwrap().field("body").unwrap();
        assert_eq!(
            body.documentation.as_deref(),
            Some("@radmin-multiline\nShown on the front page")
        );
    }

    #[test]
    fn test_block_attributes_are_not_fields() {
        let schema = parse_schema(BLOG).unwrap();
        let post = schema.model("Post").unwrap();
        assert!(post.fields.iter().all(|f| !f.name.starts_with("@@")));
    }

    #[test]
    fn test_unknown_type_reports_line() {
        let err = parse_schema("model A {\n  id Int @id\n  b Missing\n}\n").unwrap_err();
        match err {
            RadminError::SchemaParse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_schema("model A {\n  id Int @id\n").unwrap_err();
        assert!(matches!(err, RadminError::SchemaParse { line: 1, .. }));
    }

    #[test]
    fn test_split_comment_ignores_slashes_in_strings() {
        assert_eq!(
            split_comment(r#"url String @default("http://x") // note"#),
            (r#"url String @default("http://x") "#, Some(" note"))
        );
    }

    #[test]
    fn test_trailing_doc_comment_is_documentation() {
        let schema = parse_schema(
            "model Post {\n  id Int @id\n  /// @radmin-multiline\n  summary String /// Shown in lists\n  title String // not documentation\n}\n",
        )
        .unwrap();
        let post = schema.model("Post").unwrap();
        assert_eq!(
            post.field("summary").unwrap().documentation.as_deref(),
            Some("@radmin-multiline\nShown in lists")
        );
        assert_eq!(post.field("title").unwrap().documentation, None);
    }

    #[test]
    fn test_composite_types_are_embedded() {
        let schema = parse_schema(
            "type Address {\n  street String\n  city   String?\n}\n\nmodel Customer {\n  id      String    @id\n  address Address\n  past    Address[]\n}\n",
        )
        .unwrap();

        assert_eq!(schema.models.len(), 1);
        assert_eq!(schema.types.len(), 1);
        assert_eq!(schema.types[0].name, "Address");
        assert_eq!(schema.types[0].fields.len(), 2);

        let customer = schema.model("Customer").unwrap();
        let address = customer.field("address").unwrap();
        assert_eq!(address.kind, FieldKind::Composite);
        assert!(!address.is_relation());
        assert!(customer.field("past").unwrap().is_list);
    }

    #[test]
    fn test_composite_type_cannot_reference_model() {
        let err = parse_schema(
            "type Owner {\n  user User\n}\n\nmodel User {\n  id Int @id\n}\n",
        )
        .unwrap_err();
        assert!(matches!(err, RadminError::SchemaParse { line: 2, .. }));
    }

    #[test]
    fn test_unsupported_type() {
        let schema = parse_schema(
            "model Place {\n  id Int @id\n  location Unsupported(\"point\")?\n}\n",
        )
        .unwrap();
        let location = schema.model("Place").unwrap().field("location").unwrap();
        assert_eq!(location.field_type, "Unsupported");
        assert!(!location.is_required);
    }
}
