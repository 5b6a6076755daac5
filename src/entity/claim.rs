//! Value records embedded in users and roles.

use serde::{Deserialize, Serialize};

/// A typed claim about a user or role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
    /// Value type URI; absent means a plain string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: None,
        }
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }
}

/// An external login linked to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogin {
    pub provider: String,
    pub provider_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_display_name: Option<String>,
}

impl UserLogin {
    pub fn new(provider: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            provider_key: provider_key.into(),
            provider_display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.provider_display_name = Some(display_name.into());
        self
    }

    /// Whether this login is the one identified by `provider` and `provider_key`.
    pub fn is(&self, provider: &str, provider_key: &str) -> bool {
        self.provider == provider && self.provider_key == provider_key
    }
}

/// An authentication token issued to a user by a login provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    pub provider: String,
    pub name: String,
    pub value: String,
}

impl UserToken {
    pub fn is(&self, provider: &str, name: &str) -> bool {
        self.provider == provider && self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_document_shape() {
        let claim = Claim::new("scope", "create:user");
        assert_eq!(
            serde_json::to_value(&claim).unwrap(),
            json!({"type": "scope", "value": "create:user"})
        );

        let typed = Claim::new("age", "42").with_value_type("http://www.w3.org/2001/XMLSchema#integer");
        let value = serde_json::to_value(&typed).unwrap();
        assert_eq!(value["valueType"], "http://www.w3.org/2001/XMLSchema#integer");
    }

    #[test]
    fn test_login_document_shape() {
        let login = UserLogin::new("github", "12345").with_display_name("GitHub");
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            json!({"provider": "github", "providerKey": "12345", "providerDisplayName": "GitHub"})
        );
        assert!(login.is("github", "12345"));
        assert!(!login.is("github", "54321"));
    }
}
