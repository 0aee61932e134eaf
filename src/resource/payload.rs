//! Payload routing
//!
//! An artifact attribute holds either a local path, uploaded with the
//! request, or a URL the broker fetches itself. The choice is made on every
//! create and update, since the attribute may change in between.

use crate::admin::types::FunctionRuntime;
use crate::error::{ProviderError, Result};

pub const SUPPORTED_ARCHIVE_URL_SCHEMES: &[&str] = &["http://", "https://", "file://"];

/// True when `value` starts with a scheme the broker can fetch from
pub fn is_archive_url(value: &str) -> bool {
    SUPPORTED_ARCHIVE_URL_SCHEMES
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// Where the admin API gets the artifact from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Read from disk and uploaded as the `data` part
    Local(String),
    /// Sent as the `url` part
    Url(String),
}

impl Payload {
    pub fn route(value: &str) -> Self {
        if is_archive_url(value) {
            Payload::Url(value.to_string())
        } else {
            Payload::Local(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Payload::Local(path) | Payload::Url(path) => path,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Payload::Url(_))
    }
}

/// Sink archive; required at apply time
pub fn resolve_archive(archive: &str) -> Result<Payload> {
    if archive.is_empty() {
        return Err(ProviderError::Validation(
            "ERROR_NO_ARCHIVE: archive should be filled".to_string(),
        ));
    }
    Ok(Payload::route(archive))
}

/// Function code selected from the go/jar/py attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCode {
    pub runtime: FunctionRuntime,
    pub payload: Payload,
}

/// Exactly one of `go`, `jar`, `py` must be non-empty
pub fn resolve_function_code(go: &str, jar: &str, py: &str) -> Result<FunctionCode> {
    let mut code: Option<FunctionCode> = None;

    for (runtime, file) in [
        (FunctionRuntime::Go, go),
        (FunctionRuntime::Java, jar),
        (FunctionRuntime::Python, py),
    ] {
        if file.is_empty() {
            continue;
        }
        if code.is_some() {
            return Err(ProviderError::Validation(
                "ERROR_MULTIPLE_CODE_FILES: Multiple code files provided".to_string(),
            ));
        }
        code = Some(FunctionCode {
            runtime,
            payload: Payload::route(file),
        });
    }

    code.ok_or_else(|| {
        ProviderError::Validation(
            "ERROR_NO_CODE_FILE: Either go, jar, or py should be filled".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_schemes_route_to_url() {
        for value in [
            "http://repo.example.com/sink.nar",
            "https://github.com/org/repo/releases/download/v1/sink.nar",
            "file:///opt/pulsar/connectors/sink.nar",
        ] {
            assert!(is_archive_url(value), "{value}");
            assert!(Payload::route(value).is_url());
        }
    }

    #[test]
    fn test_everything_else_routes_to_local() {
        for value in [
            "/tmp/sink.nar",
            "connectors/sink.nar",
            "builtin://cassandra",
            "C:/connectors/sink.nar",
            "HTTP://upper.example.com/sink.nar",
            "ftp://old.example.com/sink.nar",
        ] {
            assert!(!is_archive_url(value), "{value}");
            assert_eq!(Payload::route(value), Payload::Local(value.to_string()));
        }
    }

    #[test]
    fn test_resolve_archive_requires_value() {
        let err = resolve_archive("").unwrap_err();
        assert!(err.to_string().starts_with("ERROR_NO_ARCHIVE"));
        assert_eq!(
            resolve_archive("/tmp/a.nar").unwrap(),
            Payload::Local("/tmp/a.nar".to_string())
        );
    }

    #[test]
    fn test_resolve_function_code_single_source() {
        let code = resolve_function_code("", "/tmp/fn.jar", "").unwrap();
        assert_eq!(code.runtime, FunctionRuntime::Java);
        assert_eq!(code.payload, Payload::Local("/tmp/fn.jar".to_string()));

        let code = resolve_function_code("", "", "https://example.com/fn.py").unwrap();
        assert_eq!(code.runtime, FunctionRuntime::Python);
        assert!(code.payload.is_url());

        let code = resolve_function_code("/tmp/fn", "", "").unwrap();
        assert_eq!(code.runtime, FunctionRuntime::Go);
    }

    #[test]
    fn test_resolve_function_code_rejects_none_or_many() {
        let err = resolve_function_code("", "", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERROR_NO_CODE_FILE: Either go, jar, or py should be filled"
        );

        for (go, jar, py) in [("a", "b", ""), ("a", "", "c"), ("", "b", "c"), ("a", "b", "c")] {
            let err = resolve_function_code(go, jar, py).unwrap_err();
            assert_eq!(
                err.to_string(),
                "ERROR_MULTIPLE_CODE_FILES: Multiple code files provided"
            );
        }
    }
}
