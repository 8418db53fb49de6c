use std::collections::HashSet;

use crate::manifest::{ActionMethod, CrudOp, Manifest};
use crate::to_snake_case;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest parse error: {0}")]
    Parse(String),

    #[error("duplicate resource `{0}`")]
    DuplicateResource(String),

    #[error("resource name `{0}` must be a PascalCase identifier")]
    BadResourceName(String),

    #[error("resource `{0}` maps to module `{1}`, already used by another resource")]
    ModuleClash(String, String),

    #[error("resource `{resource}`: path {path:?} must be '/'-separated segments of [A-Za-z0-9-._~]")]
    BadPath { resource: String, path: String },

    #[error("resource `{resource}`: `{ty}` is not a Rust type path")]
    BadType { resource: String, ty: String },

    #[error("resource `{resource}`: `{name}` is not a valid identifier")]
    BadIdentifier { resource: String, name: String },

    #[error("resource `{resource}`: method `{method}` is defined twice")]
    DuplicateMethod { resource: String, method: String },

    #[error("resource `{resource}`: GET action `{action}` cannot take a body")]
    BodyOnGet { resource: String, action: String },
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while",
];

/// snake_case Rust identifier that is not a keyword.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && s != "_"
        && !KEYWORDS.contains(&s)
}

fn is_type_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// One URL path segment made of unreserved characters only.
fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}

/// `/seg[/seg...]`, no empty segments.
fn is_resource_path(s: &str) -> bool {
    s.strip_prefix('/').is_some_and(|rest| rest.split('/').all(is_segment))
}

/// `a::b::C`, optionally with generic arguments (`Vec<crate::Item>`).
fn is_type_path(s: &str) -> bool {
    let mut rest = s.trim_start();
    type_path(&mut rest) && rest.trim().is_empty()
}

fn type_path(rest: &mut &str) -> bool {
    loop {
        let ident_len = rest
            .char_indices()
            .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
            .map_or(rest.len(), |(i, _)| i);
        if ident_len == 0 {
            return false;
        }
        *rest = &(*rest)[ident_len..];
        match rest.strip_prefix("::") {
            Some(tail) => *rest = tail,
            None => break,
        }
    }
    *rest = rest.trim_start();
    if let Some(tail) = rest.strip_prefix('<') {
        *rest = tail.trim_start();
        loop {
            if !type_path(rest) {
                return false;
            }
            *rest = rest.trim_start();
            if let Some(tail) = rest.strip_prefix(',') {
                *rest = tail.trim_start();
            } else {
                break;
            }
        }
        match rest.strip_prefix('>') {
            Some(tail) => *rest = tail,
            None => return false,
        }
    }
    true
}

/// Check a parsed manifest; returns the first problem found.
pub fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    let mut names = HashSet::new();
    for resource in &manifest.resources {
        if !is_type_name(&resource.name) {
            return Err(ManifestError::BadResourceName(resource.name.clone()));
        }
        let module = to_snake_case(&resource.name);
        if KEYWORDS.contains(&module.as_str()) {
            return Err(ManifestError::BadResourceName(resource.name.clone()));
        }
        if !names.insert(module.clone()) {
            return Err(match manifest.resources.iter().filter(|r| r.name == resource.name).count() {
                1 => ManifestError::ModuleClash(resource.name.clone(), module),
                _ => ManifestError::DuplicateResource(resource.name.clone()),
            });
        }
        if let Some(model) = resource.model.as_deref().filter(|m| !is_type_path(m)) {
            return Err(ManifestError::BadType {
                resource: resource.name.clone(),
                ty: model.to_string(),
            });
        }
        if !is_resource_path(&resource.path) {
            return Err(ManifestError::BadPath {
                resource: resource.name.clone(),
                path: resource.path.clone(),
            });
        }

        let bad_ident = |name: &str| ManifestError::BadIdentifier {
            resource: resource.name.clone(),
            name: name.to_string(),
        };
        let mut methods = HashSet::new();
        let mut claim = |method: &str| {
            if methods.insert(method.to_string()) {
                Ok(())
            } else {
                Err(ManifestError::DuplicateMethod {
                    resource: resource.name.clone(),
                    method: method.to_string(),
                })
            }
        };

        for op in &resource.crud {
            claim(op.method_name())?;
            if *op == CrudOp::List {
                claim("list_all")?;
            }
        }
        for action in &resource.actions {
            if !is_identifier(&action.name) {
                return Err(bad_ident(&action.name));
            }
            claim(&action.name)?;
            if let Some(ty) = action.returns.as_deref().filter(|t| !is_type_path(t)) {
                return Err(ManifestError::BadType {
                    resource: resource.name.clone(),
                    ty: ty.to_string(),
                });
            }
            if !is_segment(action.segment()) {
                return Err(ManifestError::BadPath {
                    resource: resource.name.clone(),
                    path: action.segment().to_string(),
                });
            }
            let mut seen = HashSet::new();
            for param in &action.params {
                // `options` and `body` are taken by the generated signature.
                if !is_identifier(param) || matches!(param.as_str(), "options" | "body") || !seen.insert(param) {
                    return Err(bad_ident(param));
                }
            }
            if action.body && action.method == ActionMethod::Get {
                return Err(ManifestError::BodyOnGet {
                    resource: resource.name.clone(),
                    action: action.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(toml: &str) -> Result<(), ManifestError> {
        validate(&Manifest::from_toml(toml).unwrap())
    }

    #[test]
    fn sample_manifest_is_valid() {
        let m = Manifest::from_toml(include_str!("../manifests/erp.toml")).unwrap();
        assert_eq!(validate(&m), Ok(()));
    }

    #[test]
    fn duplicate_resource() {
        let err = check(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            [[resource]]
            name = "Item"
            path = "/items2"
            "#,
        )
        .unwrap_err();
        assert_eq!(err, ManifestError::DuplicateResource("Item".into()));
    }

    #[test]
    fn bad_names_and_paths() {
        assert!(matches!(
            check("[[resource]]\nname = \"item\"\npath = \"/items\""),
            Err(ManifestError::BadResourceName(_))
        ));
        assert!(matches!(
            check("[[resource]]\nname = \"Item\"\npath = \"items\""),
            Err(ManifestError::BadPath { .. })
        ));
        assert!(matches!(
            check("[[resource]]\nname = \"Item\"\npath = \"\""),
            Err(ManifestError::BadPath { .. })
        ));
    }

    #[test]
    fn action_rules() {
        let base = "[[resource]]\nname = \"Item\"\npath = \"/items\"\n[[resource.action]]\n";

        let err = check(&format!("{base}name = \"get\"\nmethod = \"post\"")).unwrap_err();
        assert_eq!(
            err,
            ManifestError::DuplicateMethod {
                resource: "Item".into(),
                method: "get".into()
            }
        );

        let err = check(&format!("{base}name = \"unitSets\"\nmethod = \"get\"")).unwrap_err();
        assert!(matches!(err, ManifestError::BadIdentifier { name, .. } if name == "unitSets"));

        let err = check(&format!("{base}name = \"copy\"\nmethod = \"get\"\nparams = [\"type\"]")).unwrap_err();
        assert!(matches!(err, ManifestError::BadIdentifier { name, .. } if name == "type"));

        let err = check(&format!("{base}name = \"copy\"\nmethod = \"get\"\nparams = [\"body\"]")).unwrap_err();
        assert!(matches!(err, ManifestError::BadIdentifier { .. }));

        let err = check(&format!("{base}name = \"copy\"\nmethod = \"get\"\nbody = true")).unwrap_err();
        assert!(matches!(err, ManifestError::BodyOnGet { .. }));

        let err = check(&format!("{base}name = \"copy\"\nmethod = \"post\"\npath = \"a/b\"")).unwrap_err();
        assert!(matches!(err, ManifestError::BadPath { .. }));
    }

    #[test]
    fn names_that_collide_as_modules() {
        let err = check(
            r#"
            [[resource]]
            name = "ABc"
            path = "/a"
            [[resource]]
            name = "Abc"
            path = "/b"
            "#,
        )
        .unwrap_err();
        assert_eq!(err, ManifestError::ModuleClash("Abc".into(), "abc".into()));

        assert_eq!(
            check("[[resource]]\nname = \"Type\"\npath = \"/types\""),
            Err(ManifestError::BadResourceName("Type".into()))
        );
    }

    #[test]
    fn paths_must_be_url_safe() {
        for path in ["/items\"", "/it\\ems", "/items/", "//items", "/items?x=1", "/a b"] {
            let toml = format!("[[resource]]\nname = \"Item\"\npath = {:?}", path);
            assert!(
                matches!(check(&toml), Err(ManifestError::BadPath { .. })),
                "{path} should be rejected"
            );
        }
        assert_eq!(check("[[resource]]\nname = \"Item\"\npath = \"/inv/items.v2\""), Ok(()));

        let base = "[[resource]]\nname = \"Item\"\npath = \"/items\"\n[[resource.action]]\n";
        let err = check(&format!("{base}name = \"copy\"\nmethod = \"post\"\npath = \"co\\\"py\"")).unwrap_err();
        assert!(matches!(err, ManifestError::BadPath { .. }));
    }

    #[test]
    fn model_and_returns_must_be_type_paths() {
        let ok = check(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            model = "crate::models::Item"
            [[resource.action]]
            name = "unit_sets"
            method = "get"
            returns = "Vec<crate::models::UnitSet>"
            "#,
        );
        assert_eq!(ok, Ok(()));

        for ty in ["Item\"", "Vec<Item", "a::", "9Item", "Item; fn x()", "Map<String,>"] {
            let toml = format!("[[resource]]\nname = \"Item\"\npath = \"/items\"\nmodel = {:?}", ty);
            assert!(
                matches!(check(&toml), Err(ManifestError::BadType { .. })),
                "{ty} should be rejected"
            );
        }
    }

    #[test]
    fn restricted_crud_frees_method_names() {
        let ok = check(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            crud = ["list"]
            [[resource.action]]
            name = "get"
            method = "get"
            params = ["code"]
            "#,
        );
        assert_eq!(ok, Ok(()));
    }
}
