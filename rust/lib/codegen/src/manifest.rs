use serde::{Deserialize, Serialize};

use crate::validate::ManifestError;

/// Endpoint manifest: the resources to generate facades for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "resource")]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// PascalCase; the facade is named `<name>Client`.
    pub name: String,
    /// Collection path relative to the API base, e.g. `/items`.
    pub path: String,
    /// Record type the facade decodes into. Defaults to `serde_json::Value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "CrudOp::all")]
    pub crud: Vec<CrudOp>,
    #[serde(default, rename = "action")]
    pub actions: Vec<Action>,
}

impl Resource {
    pub fn supports(&self, op: CrudOp) -> bool {
        self.crud.contains(&op)
    }

    pub fn model_type(&self) -> &str {
        self.model.as_deref().unwrap_or("Value")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOp {
    List,
    Get,
    Create,
    Update,
    Patch,
    Delete,
}

impl CrudOp {
    pub const ALL: [CrudOp; 6] = [
        CrudOp::List,
        CrudOp::Get,
        CrudOp::Create,
        CrudOp::Update,
        CrudOp::Patch,
        CrudOp::Delete,
    ];

    fn all() -> Vec<CrudOp> {
        Self::ALL.to_vec()
    }

    /// Name of the generated facade method.
    pub fn method_name(self) -> &'static str {
        match self {
            CrudOp::List => "list",
            CrudOp::Get => "get",
            CrudOp::Create => "create",
            CrudOp::Update => "update",
            CrudOp::Patch => "patch",
            CrudOp::Delete => "delete",
        }
    }
}

/// Custom server action under the resource path:
/// `{resource}/{path}/{params...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// snake_case method name on the facade.
    pub name: String,
    pub method: ActionMethod,
    /// URL segment; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Positional path parameters, in URL order.
    #[serde(default)]
    pub params: Vec<String>,
    /// Whether the action takes a JSON body (POST only).
    #[serde(default)]
    pub body: bool,
    /// Response type. Defaults to `serde_json::Value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

impl Action {
    pub fn segment(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    pub fn return_type(&self) -> &str {
        self.returns.as_deref().unwrap_or("Value")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMethod {
    Get,
    Post,
}

impl Manifest {
    /// Parse a TOML manifest. Structure only; see [`crate::validate`].
    pub fn from_toml(input: &str) -> Result<Self, ManifestError> {
        toml::from_str(input).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let m = Manifest::from_toml(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            "#,
        )
        .unwrap();
        let item = m.resource("Item").unwrap();
        assert_eq!(item.crud, CrudOp::ALL.to_vec());
        assert_eq!(item.model_type(), "Value");
        assert!(item.actions.is_empty());
    }

    #[test]
    fn actions_and_restricted_crud() {
        let m = Manifest::from_toml(
            r#"
            [[resource]]
            name = "Arp"
            path = "/arps"
            model = "crate::models::Arp"
            crud = ["list", "get"]

            [[resource.action]]
            name = "unit_sets"
            method = "get"
            path = "unitSets"
            params = ["id"]
            "#,
        )
        .unwrap();
        let arp = &m.resources[0];
        assert!(arp.supports(CrudOp::List));
        assert!(!arp.supports(CrudOp::Delete));
        assert_eq!(arp.model_type(), "crate::models::Arp");
        let action = &arp.actions[0];
        assert_eq!(action.method, ActionMethod::Get);
        assert_eq!(action.segment(), "unitSets");
        assert_eq!(action.return_type(), "Value");
        assert!(!action.body);
    }

    #[test]
    fn unknown_verb_is_parse_error() {
        let err = Manifest::from_toml(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            crud = ["list", "upsert"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));

        let err = Manifest::from_toml(
            r#"
            [[resource]]
            name = "Item"
            path = "/items"
            [[resource.action]]
            name = "x"
            method = "put"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }
}
