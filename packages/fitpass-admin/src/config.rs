use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use table_store::{AccessToken, RestStore};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// The person the seeding tasks create a profile for.
#[derive(Debug, Clone, Default)]
pub struct OwnerProfile {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Admin configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub project_ref: String,
    pub supabase_url: String,
    pub supabase_key: AccessToken,
    pub output_dir: PathBuf,
    pub owner: OwnerProfile,
    pub app_url: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_ref = var("SUPABASE_PROJECT_REF").context("SUPABASE_PROJECT_REF must be set")?;
        let supabase_key = var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?;
        let supabase_key = AccessToken::parse(supabase_key).context("SUPABASE_KEY is not usable")?;
        let supabase_url = var("SUPABASE_URL")
            .unwrap_or_else(|| format!("https://{project_ref}.supabase.co"))
            .trim_end_matches('/')
            .to_string();

        let http_timeout = match var("FITPASS_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .context("FITPASS_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    bail!("FITPASS_HTTP_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            project_ref,
            supabase_url,
            supabase_key,
            output_dir: var("FITPASS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            owner: OwnerProfile {
                email: var("FITPASS_OWNER_EMAIL"),
                full_name: var("FITPASS_OWNER_NAME"),
                phone: var("FITPASS_OWNER_PHONE"),
            },
            app_url: var("FITPASS_APP_URL"),
            http_timeout,
        })
    }

    /// Project page in the hosted dashboard.
    pub fn dashboard_url(&self) -> String {
        format!("https://supabase.com/dashboard/project/{}", self.project_ref)
    }

    /// Open a REST client for the configured project.
    pub fn connect(&self) -> Result<RestStore> {
        let store = RestStore::new(&self.supabase_url, self.supabase_key.clone())
            .context("Failed to build table store client")?
            .with_timeout(self.http_timeout)
            .context("Failed to build HTTP client")?;
        Ok(store)
    }
}
