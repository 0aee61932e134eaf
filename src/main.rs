use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pulsar_provider::resource::{attributes_from_json, get_all_resource_types};
use pulsar_provider::{
    get_resource, AttributeBag, Provider, ProviderConfig, ProviderError, ProviderMeta, Resource,
    ResourceData,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Drive the Pulsar resource provider lifecycle from the command line
#[derive(Parser, Debug)]
#[command(name = "pulsar-provider", version, about, long_about = None)]
struct Args {
    /// Resource type, e.g. pulsar_sink
    resource: String,

    /// Lifecycle operation to run
    #[arg(value_enum)]
    action: Action,

    /// JSON or YAML file holding the resource attributes
    #[arg(short, long)]
    attrs: Option<PathBuf>,

    /// Resource identity (import address for `import`)
    #[arg(long)]
    id: Option<String>,

    /// Admin REST endpoint, overrides config and WEB_SERVICE_URL
    #[arg(long)]
    web_service_url: Option<String>,

    /// Bearer token, overrides config and PULSAR_AUTH_TOKEN
    #[arg(long)]
    token: Option<String>,

    /// Admin API version of the primary client (2 or 3)
    #[arg(long)]
    api_version: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    Create,
    Read,
    Update,
    Delete,
    Exists,
    Import,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("pulsar-provider started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pulsar-provider").join("pulsar-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".pulsar-provider").join("pulsar-provider.log");
    }
    PathBuf::from("pulsar-provider.log")
}

/// Read an attribute map; `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
/// Null values leave the attribute unset.
fn load_attributes(path: &Path) -> Result<AttributeBag> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read attributes from {:?}", path))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let values: BTreeMap<String, serde_json::Value> = if is_yaml {
        serde_yaml::from_str(&content).context("Failed to parse attributes YAML")?
    } else {
        serde_json::from_str(&content).context("Failed to parse attributes JSON")?
    };

    Ok(AttributeBag::from_attributes(attributes_from_json(values)))
}

async fn run_action(
    resource: &dyn Resource,
    action: Action,
    state: &mut AttributeBag,
    meta: &ProviderMeta,
) -> Result<Option<bool>> {
    let schema = resource.schema();

    match action {
        Action::Create => {
            schema.apply_defaults(state);
            schema.check(state)?;
            resource.create(state, meta).await?;
        }
        Action::Update => {
            schema.apply_defaults(state);
            schema.check(state)?;
            resource.update(state, meta).await?;
        }
        Action::Read => resource.read(state, meta).await?,
        Action::Delete => resource.delete(state, meta).await?,
        Action::Import => resource.import(state, meta).await?,
        Action::Exists => return Ok(Some(resource.exists(state, meta).await?)),
    }

    Ok(None)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = ProviderConfig::load();
    if let Some(url) = args.web_service_url.clone() {
        config.web_service_url = url;
    }
    if let Some(token) = args.token.clone() {
        config.token = Some(token);
    }
    if let Some(version) = args.api_version.clone() {
        config.api_version = version;
    }

    let Some(resource) = get_resource(&args.resource) else {
        return Err(ProviderError::UnknownResource(format!(
            "{} (known: {})",
            args.resource,
            get_all_resource_types().join(", ")
        ))
        .into());
    };

    let provider = Provider::new();
    let meta = provider.configure(&config)?;

    let mut state = match &args.attrs {
        Some(path) => load_attributes(path)?,
        None => AttributeBag::new(),
    };
    if let Some(id) = &args.id {
        state.set_id(id);
    }

    tracing::info!("{} {:?}", resource.type_name(), args.action);

    let output = match run_action(resource.as_ref(), args.action, &mut state, &meta).await? {
        Some(exists) => serde_json::json!({ "exists": exists }),
        None => serde_json::to_value(&state)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_provider::resource::AttrValue;

    #[test]
    fn test_load_yaml_with_floats_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.yaml");
        std::fs::write(
            &path,
            "sink: s3\narchive: ~\nparallelism: 2\nconfigs:\n  ratio: 0.5\n  bucket: logs\n",
        )
        .unwrap();

        let bag = load_attributes(&path).unwrap();
        assert_eq!(bag.get_str("sink"), "s3");
        assert!(bag.get("archive").is_none());
        assert_eq!(bag.get_int("parallelism"), 2);
        let configs = bag.get_map("configs");
        assert_eq!(configs["ratio"], AttrValue::from("0.5"));
        assert_eq!(configs["bucket"], AttrValue::from("logs"));
    }

    #[test]
    fn test_load_json_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenant.json");
        std::fs::write(&path, r#"{"tenant": "acme", "admin_roles": ["ops"]}"#).unwrap();

        let bag = load_attributes(&path).unwrap();
        assert_eq!(bag.get_str("tenant"), "acme");
        assert_eq!(bag.get_list("admin_roles"), vec!["ops"]);
    }
}
