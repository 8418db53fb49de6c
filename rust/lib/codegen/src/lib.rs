//! Facade generator for ERP REST resources.
//!
//! Reads an endpoint manifest (TOML) and emits one typed client per
//! resource on top of `erp_client::ResourceClient`.

pub mod manifest;
pub mod rust_facade;
pub mod validate;

pub use manifest::{Action, ActionMethod, CrudOp, Manifest, Resource};
pub use rust_facade::RustFacadeGenerator;
pub use validate::{validate, ManifestError};

/// Codegen trait - implement this for each target.
pub trait Codegen {
    fn generate(&self, manifest: &Manifest) -> anyhow::Result<GeneratedCode>;
    fn target(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// `SalesOrder` -> `sales_order`, `unitSets` -> `unit_sets`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;
    for ch in s.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            result.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    result
}
