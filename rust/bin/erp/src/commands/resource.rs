//! Generic resource commands.
//!
//! `erp get /items`, `erp create /arps --json '{...}'`, etc. The resource
//! argument is the collection path relative to the context's server URL.

use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::Value;
use tracing::debug;

use erp_client::{Client, ResourceClient};

use super::query::QueryArgs;
use crate::config::ClientConfig;

fn resource(path: &str, client_config_path: &Path) -> Result<ResourceClient<Value>> {
    let config = ClientConfig::load(client_config_path)?;
    let ctx = config.current()?;
    debug!(context = %ctx.name, server = %ctx.server, "using context");
    let client = Client::new(ctx.dispatcher_config()?)?;
    Ok(client.resource(normalize(path)))
}

/// `items` and `/items/` both mean `/items`.
fn normalize(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

fn parse_body(json_body: &str) -> Result<Value> {
    serde_json::from_str(json_body).context("Invalid JSON body")
}

fn print(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// GET a collection page, every page (`all`), or one record by id.
pub async fn get(
    path: &str,
    id: Option<&str>,
    all: bool,
    args: &QueryArgs,
    client_config_path: &Path,
) -> Result<()> {
    let resource = resource(path, client_config_path)?;
    let options = args.options()?;

    if let Some(id) = id {
        if args.filter.is_some() {
            anyhow::bail!("--where cannot be combined with an id.");
        }
        return print(&resource.get(id, Some(&options)).await?);
    }

    let criteria = args.criteria()?;
    if all {
        let items = resource.list_all(criteria.as_ref(), Some(&options)).await?;
        return print(&Value::Array(items));
    }
    let page = resource.list(criteria.as_ref(), Some(&options)).await?;
    print(&serde_json::to_value(&page)?)
}

pub async fn create(path: &str, json_body: &str, client_config_path: &Path) -> Result<()> {
    let body = parse_body(json_body)?;
    let created = resource(path, client_config_path)?.create(&body).await?;
    print(&created)
}

/// Full replacement (PUT).
pub async fn update(path: &str, id: &str, json_body: &str, client_config_path: &Path) -> Result<()> {
    let body = parse_body(json_body)?;
    let updated = resource(path, client_config_path)?.update(id, &body).await?;
    print(&updated)
}

pub async fn patch(path: &str, id: &str, json_body: &str, client_config_path: &Path) -> Result<()> {
    let body = parse_body(json_body)?;
    let patched = resource(path, client_config_path)?.patch(id, &body).await?;
    print(&patched)
}

pub async fn delete(path: &str, id: &str, client_config_path: &Path) -> Result<()> {
    resource(path, client_config_path)?.delete(id).await?;
    println!("Deleted {}/{}.", normalize(path), id);
    Ok(())
}
