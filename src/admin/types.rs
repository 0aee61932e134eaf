//! Request and response objects of the admin API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sink definition as exchanged with `/admin/v3/sinks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Never returned by reads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configs: BTreeMap<String, Value>,
    #[serde(default)]
    pub parallelism: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_guarantees: Option<String>,
    #[serde(default)]
    pub retain_ordering: bool,
    /// Never returned by reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_runtime_options: Option<String>,
}

/// Function runtime, derived from which code attribute is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionRuntime {
    Java,
    Python,
    Go,
}

/// Function definition as exchanged with `/admin/v3/functions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConfig {
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub parallelism: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_guarantees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<FunctionRuntime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub py: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go: Option<String>,
}

/// Tenant definition as exchanged with `/admin/v2/tenants`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    #[serde(default)]
    pub admin_roles: Vec<String>,
    #[serde(default)]
    pub allowed_clusters: Vec<String>,
}

/// Extra part sent along function and sink updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    pub update_auth_data: bool,
}

/// Error produced by the admin-side name parsers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

/// Topic domain, the scheme part of a topic name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicDomain {
    Persistent,
    NonPersistent,
}

impl FromStr for TopicDomain {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "persistent" => Ok(TopicDomain::Persistent),
            "non-persistent" => Ok(TopicDomain::NonPersistent),
            other => Err(ParseError(format!(
                "The domain only can be specified as 'persistent' or 'non-persistent'. Input domain is '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TopicDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicDomain::Persistent => f.write_str("persistent"),
            TopicDomain::NonPersistent => f.write_str("non-persistent"),
        }
    }
}

/// Permission that can be granted on a namespace or topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Produce,
    Consume,
    Functions,
    Packages,
    Sinks,
    Sources,
}

impl FromStr for AuthAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "produce" => Ok(AuthAction::Produce),
            "consume" => Ok(AuthAction::Consume),
            "functions" => Ok(AuthAction::Functions),
            "packages" => Ok(AuthAction::Packages),
            "sinks" => Ok(AuthAction::Sinks),
            "sources" => Ok(AuthAction::Sources),
            other => Err(ParseError(format!(
                "The auth action only can be specified as 'produce', 'consume', 'functions', 'packages', 'sinks', or 'sources'. Invalid auth action '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sink_config_reads_camel_case_without_archive() {
        let raw = json!({
            "tenant": "public",
            "namespace": "default",
            "name": "s3-sink",
            "parallelism": 2,
            "processingGuarantees": "ATLEAST_ONCE",
            "retainOrdering": true,
            "configs": {"bucket": "logs"}
        });
        let sink: SinkConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(sink.name, "s3-sink");
        assert_eq!(sink.parallelism, 2);
        assert_eq!(sink.processing_guarantees.as_deref(), Some("ATLEAST_ONCE"));
        assert!(sink.archive.is_none());
        assert!(sink.inputs.is_empty());
        assert_eq!(sink.configs["bucket"], json!("logs"));
    }

    #[test]
    fn test_function_config_skips_unset_code_fields() {
        let function = FunctionConfig {
            tenant: "public".to_string(),
            namespace: "default".to_string(),
            name: "exclaim".to_string(),
            runtime: Some(FunctionRuntime::Python),
            py: Some("exclaim.py".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&function).unwrap();
        assert_eq!(value["runtime"], json!("PYTHON"));
        assert_eq!(value["py"], json!("exclaim.py"));
        assert!(value.get("jar").is_none());
        assert!(value.get("go").is_none());
    }

    #[test]
    fn test_update_options_wire_name() {
        let value = serde_json::to_value(UpdateOptions {
            update_auth_data: true,
        })
        .unwrap();
        assert_eq!(value, json!({"updateAuthData": true}));
    }

    #[test]
    fn test_topic_domain_parse() {
        assert_eq!("persistent".parse(), Ok(TopicDomain::Persistent));
        assert_eq!("non-persistent".parse(), Ok(TopicDomain::NonPersistent));
        assert!("Persistent".parse::<TopicDomain>().is_err());
    }

    #[test]
    fn test_auth_action_parse() {
        assert_eq!("consume".parse(), Ok(AuthAction::Consume));
        let err = "admin".parse::<AuthAction>().unwrap_err();
        assert!(err.to_string().contains("'admin'"));
    }
}
