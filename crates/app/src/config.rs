use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/splitledger.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    /// Bearer token issued by the auth service. Read from the config file or
    /// `SPLITLEDGER_TOKEN`, never from the CLI.
    pub token: String,
    pub group: i64,
    pub page_size: usize,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            username: String::new(),
            token: String::new(),
            group: 0,
            page_size: 20,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username.
    #[arg(long)]
    username: Option<String>,
    /// Override group id.
    #[arg(long)]
    group: Option<i64>,
    /// Override expenses page size.
    #[arg(long)]
    page_size: Option<usize>,
}

pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    // try_parsing so numeric fields (group, page_size) work from env vars.
    builder = builder.add_source(config::Environment::with_prefix("SPLITLEDGER").try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(username) = &args.username {
        settings.username = username.clone();
    }
    if let Some(group) = args.group {
        settings.group = group;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }

    Ok(settings)
}
