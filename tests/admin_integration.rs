//! Integration tests for the Pulsar admin client using wiremock
//!
//! These tests verify URL construction, authentication, multipart payloads
//! and error mapping against mocked admin endpoints.

use pulsar_provider::admin::types::{SinkConfig, TenantInfo, UpdateOptions};
use pulsar_provider::admin::{AdminError, ApiVersion, PulsarAdmin};
use pulsar_provider::ProviderConfig;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin(server: &MockServer, version: ApiVersion, token: Option<&str>) -> PulsarAdmin {
    let config = ProviderConfig {
        web_service_url: format!("{}/", server.uri()),
        token: token.map(str::to_string),
        ..Default::default()
    };
    PulsarAdmin::new(&config, version).expect("client should build")
}

fn sink_config() -> SinkConfig {
    SinkConfig {
        tenant: "public".to_string(),
        namespace: "default".to_string(),
        name: "s3".to_string(),
        inputs: vec!["persistent://public/default/in".to_string()],
        parallelism: 1,
        ..Default::default()
    }
}

mod admin_client_tests {
    use super::*;

    /// GET of a sink hits the v3 path and parses the camelCase body
    #[tokio::test]
    async fn test_get_sink_parses_config() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/v3/sinks/public/default/s3"))
            .and(bearer_token("secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tenant": "public",
                "namespace": "default",
                "name": "s3",
                "parallelism": 2,
                "retainOrdering": true,
                "processingGuarantees": "ATLEAST_ONCE",
                "configs": {"bucket": "logs"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, Some("secret"));
        let sink = client
            .sinks()
            .get_sink("public", "default", "s3")
            .await
            .expect("sink should be returned");

        assert_eq!(sink.parallelism, 2);
        assert!(sink.retain_ordering);
        assert_eq!(sink.processing_guarantees.as_deref(), Some("ATLEAST_ONCE"));
        assert_eq!(sink.configs["bucket"], "logs");
        assert!(sink.archive.is_none());
    }

    /// 404 maps to a not-found API error carrying the server reason
    #[tokio::test]
    async fn test_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/v3/sinks/public/default/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"reason": "Sink missing doesn't exist"})),
            )
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        let err = client
            .sinks()
            .get_sink("public", "default", "missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "code: 404 reason: Sink missing doesn't exist");
    }

    /// Non-JSON error bodies are passed through as the reason
    #[tokio::test]
    async fn test_500_plain_body_reason() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/v2/tenants/public"))
            .respond_with(ResponseTemplate::new(500).set_body_string("broker unavailable"))
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V2, None);
        let err = client.tenants().get_tenant("public").await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(matches!(err, AdminError::Api { code: 500, .. }));
        assert!(err.to_string().contains("broker unavailable"));
    }

    /// Creating with a URL sends the url part instead of uploading data
    #[tokio::test]
    async fn test_create_sink_with_url_sends_url_part() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/v3/sinks/public/default/s3"))
            .and(body_string_contains("name=\"url\""))
            .and(body_string_contains("https://example.com/s3.nar"))
            .and(body_string_contains("name=\"sinkConfig\""))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        client
            .sinks()
            .create_sink_with_url(&sink_config(), "https://example.com/s3.nar")
            .await
            .expect("create should succeed");
    }

    /// Creating from a local archive uploads the file as the data part
    #[tokio::test]
    async fn test_create_sink_uploads_local_archive() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("s3.nar");
        std::fs::write(&archive, "nar-bytes").unwrap();

        Mock::given(method("POST"))
            .and(path("/admin/v3/sinks/public/default/s3"))
            .and(body_string_contains("name=\"data\""))
            .and(body_string_contains("nar-bytes"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        client
            .sinks()
            .create_sink(&sink_config(), archive.to_str().unwrap())
            .await
            .expect("create should succeed");
    }

    /// A missing local archive fails before any request is sent
    #[tokio::test]
    async fn test_missing_archive_is_artifact_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        let err = client
            .sinks()
            .create_sink(&sink_config(), "/definitely/not/here.nar")
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Artifact { .. }));
    }

    /// Updates without an archive keep the deployed package
    #[tokio::test]
    async fn test_update_sink_without_archive() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/admin/v3/sinks/public/default/s3"))
            .and(body_string_contains("name=\"updateOptions\""))
            .and(body_string_contains("updateAuthData"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        let options = UpdateOptions {
            update_auth_data: true,
        };
        client
            .sinks()
            .update_sink(&sink_config(), "", &options)
            .await
            .expect("update should succeed");
    }

    /// Tenant create is a PUT with a JSON body
    #[tokio::test]
    async fn test_create_tenant_put_json() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/admin/v2/tenants/acme"))
            .and(body_string_contains("\"allowedClusters\":[\"standalone\"]"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V2, None);
        let info = TenantInfo {
            admin_roles: vec![],
            allowed_clusters: vec!["standalone".to_string()],
        };
        client
            .tenants()
            .create_tenant("acme", &info)
            .await
            .expect("create should succeed");
    }

    /// DELETE with an empty body succeeds
    #[tokio::test]
    async fn test_delete_function() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/admin/v3/functions/public/default/exclaim"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = admin(&server, ApiVersion::V3, None);
        client
            .functions()
            .delete_function("public", "default", "exclaim")
            .await
            .expect("delete should succeed");
    }

    /// Path segments are percent-encoded
    #[tokio::test]
    async fn test_segments_are_encoded() {
        let server = MockServer::start().await;
        let client = admin(&server, ApiVersion::V3, None);

        let url = client.admin_url("sinks", &["public", "default", "my sink"]);
        assert!(url.ends_with("/admin/v3/sinks/public/default/my%20sink"));
        assert!(!url.contains("//admin"));
    }
}
