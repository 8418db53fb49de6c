//! Rust resource facade generator.

use anyhow::Result;
use tracing::debug;

use crate::manifest::{Action, ActionMethod, CrudOp, Manifest, Resource};
use crate::{to_snake_case, validate, Codegen, GeneratedCode, GeneratedFile};

const HEADER: &str = "// Auto-generated by erp-codegen. Do not edit.\n";

/// Emits `<snake>.rs` with a `<Name>Client` per resource, plus a `mod.rs`
/// declaring and re-exporting them.
pub struct RustFacadeGenerator;

impl Codegen for RustFacadeGenerator {
    fn generate(&self, manifest: &Manifest) -> Result<GeneratedCode> {
        validate(manifest)?;

        let mut files = Vec::new();
        let mut module = String::from(HEADER);
        module.push('\n');

        for resource in &manifest.resources {
            let snake = to_snake_case(&resource.name);
            debug!(resource = %resource.name, file = %format!("{}.rs", snake), "generating facade");
            files.push(GeneratedFile {
                path: format!("{}.rs", snake),
                content: generate_facade(resource),
            });
            module.push_str(&format!("pub mod {};\n", snake));
        }
        module.push('\n');
        for resource in &manifest.resources {
            module.push_str(&format!(
                "pub use {}::{}Client;\n",
                to_snake_case(&resource.name),
                resource.name
            ));
        }

        files.push(GeneratedFile {
            path: "mod.rs".to_string(),
            content: module,
        });
        Ok(GeneratedCode { files })
    }

    fn target(&self) -> &str {
        "rust-facade"
    }
}

fn generate_facade(resource: &Resource) -> String {
    let mut output = String::from(HEADER);
    let model = resource.model_type();
    let client_name = format!("{}Client", resource.name);

    // Imports: only what the methods below reference.
    let lists = resource.supports(CrudOp::List);
    let takes_options = lists
        || resource.supports(CrudOp::Get)
        || resource.actions.iter().any(|a| a.method == ActionMethod::Get);
    let needs_value = resource.model.is_none()
        || resource.supports(CrudOp::Patch)
        || resource
            .actions
            .iter()
            .any(|a| a.returns.is_none() || a.method == ActionMethod::Post);

    let mut client_imports = vec!["ApiError"];
    if lists {
        client_imports.push("ApiResponse");
    }
    client_imports.extend(["Client", "ResourceClient"]);
    output.push('\n');
    output.push_str(&format!("use erp_client::{{{}}};\n", client_imports.join(", ")));
    match (lists, takes_options) {
        (true, _) => output.push_str("use erp_query::{QueryOptions, SearchCriteria};\n"),
        (false, true) => output.push_str("use erp_query::QueryOptions;\n"),
        (false, false) => {}
    }
    if needs_value {
        output.push_str("use serde_json::Value;\n");
    }
    output.push('\n');

    // Struct
    output.push_str(&format!("/// Client for `{}`.\n", resource.path));
    output.push_str("#[derive(Clone)]\n");
    output.push_str(&format!("pub struct {} {{\n", client_name));
    output.push_str(&format!("    inner: ResourceClient<{}>,\n", model));
    output.push_str("}\n\n");

    output.push_str(&format!("impl {} {{\n", client_name));
    output.push_str(&format!("    pub const PATH: &'static str = \"{}\";\n\n", resource.path));
    output.push_str("    pub fn new(client: &Client) -> Self {\n");
    output.push_str("        Self { inner: client.resource(Self::PATH) }\n");
    output.push_str("    }\n\n");
    output.push_str(&format!("    pub fn inner(&self) -> &ResourceClient<{}> {{\n", model));
    output.push_str("        &self.inner\n");
    output.push_str("    }\n");

    for op in CrudOp::ALL {
        if resource.supports(op) {
            output.push('\n');
            output.push_str(&crud_method(op, model));
        }
    }
    for action in &resource.actions {
        output.push('\n');
        output.push_str(&action_method(action));
    }

    output.push_str("}\n");
    output
}

fn crud_method(op: CrudOp, model: &str) -> String {
    let mut output = String::new();
    match op {
        CrudOp::List => {
            output.push_str("    pub async fn list(\n");
            output.push_str("        &self,\n");
            output.push_str("        criteria: Option<&SearchCriteria>,\n");
            output.push_str("        options: Option<&QueryOptions>,\n");
            output.push_str(&format!("    ) -> Result<ApiResponse<{}>, ApiError> {{\n", model));
            output.push_str("        self.inner.list(criteria, options).await\n");
            output.push_str("    }\n\n");
            output.push_str("    pub async fn list_all(\n");
            output.push_str("        &self,\n");
            output.push_str("        criteria: Option<&SearchCriteria>,\n");
            output.push_str("        options: Option<&QueryOptions>,\n");
            output.push_str(&format!("    ) -> Result<Vec<{}>, ApiError> {{\n", model));
            output.push_str("        self.inner.list_all(criteria, options).await\n");
            output.push_str("    }\n");
        }
        CrudOp::Get => {
            output.push_str(&format!(
                "    pub async fn get(&self, id: &str, options: Option<&QueryOptions>) -> Result<{}, ApiError> {{\n",
                model
            ));
            output.push_str("        self.inner.get(id, options).await\n");
            output.push_str("    }\n");
        }
        CrudOp::Create => {
            output.push_str(&format!(
                "    pub async fn create(&self, body: &{}) -> Result<{}, ApiError> {{\n",
                model, model
            ));
            output.push_str("        self.inner.create(body).await\n");
            output.push_str("    }\n");
        }
        CrudOp::Update => {
            output.push_str(&format!(
                "    pub async fn update(&self, id: &str, body: &{}) -> Result<{}, ApiError> {{\n",
                model, model
            ));
            output.push_str("        self.inner.update(id, body).await\n");
            output.push_str("    }\n");
        }
        CrudOp::Patch => {
            output.push_str(&format!(
                "    pub async fn patch(&self, id: &str, body: &Value) -> Result<{}, ApiError> {{\n",
                model
            ));
            output.push_str("        self.inner.patch(id, body).await\n");
            output.push_str("    }\n");
        }
        CrudOp::Delete => {
            output.push_str("    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {\n");
            output.push_str("        self.inner.delete(id).await\n");
            output.push_str("    }\n");
        }
    }
    output
}

fn action_method(action: &Action) -> String {
    let mut output = String::new();
    let ret = action.return_type();
    let mut args: Vec<String> = action.params.iter().map(|p| format!("{}: &str", p)).collect();
    let params = format!("&[{}]", action.params.join(", "));

    let verb = match action.method {
        ActionMethod::Get => "GET",
        ActionMethod::Post => "POST",
    };
    let mut route = format!("{{path}}/{}", action.segment());
    for p in &action.params {
        route.push_str(&format!("/{{{}}}", p));
    }
    output.push_str(&format!("    /// `{} {}`\n", verb, route));

    let call = match action.method {
        ActionMethod::Get => {
            args.push("options: Option<&QueryOptions>".to_string());
            format!("self.inner.action_get(\"{}\", {}, options)", action.segment(), params)
        }
        ActionMethod::Post if action.body => {
            args.push("body: Option<&Value>".to_string());
            format!("self.inner.action_post(\"{}\", {}, body)", action.segment(), params)
        }
        ActionMethod::Post => format!(
            "self.inner.action_post::<{}, Value>(\"{}\", {}, None)",
            ret,
            action.segment(),
            params
        ),
    };

    output.push_str(&format!(
        "    pub async fn {}(&self{}) -> Result<{}, ApiError> {{\n",
        action.name,
        args.iter().map(|a| format!(", {}", a)).collect::<String>(),
        ret
    ));
    output.push_str(&format!("        {}.await\n", call));
    output.push_str("    }\n");
    output
}
