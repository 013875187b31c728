use serde::Deserialize;
use std::env;
use std::fs::{File, metadata};
use std::io::Read;
use once_cell::sync::Lazy;

use crate::cores::errors::InviteError;

// ---------------------------------------------- Trustpilot API ----------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Trustpilot {
    pub token_url: String,
    // Business-unit scoped email invitations and service review links
    pub invitations_api: String,
    // Business-unit scoped product review links
    pub product_reviews_api: String,
}

impl Default for Trustpilot {
    fn default() -> Self {
        Trustpilot {
            token_url: "https://api.trustpilot.com/v1/oauth/oauth-token".to_string(),
            invitations_api: "https://invitations-api.trustpilot.com/v1/private/business-units".to_string(),
            product_reviews_api: "https://api.trustpilot.com/v1/private/product-reviews/business-units".to_string(),
        }
    }
}

// Sender identity used for every email invitation
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sender {
    pub sender_email: String,
    pub sender_name: String,
    pub reply_to: String,
}

impl Default for Sender {
    fn default() -> Self {
        Sender {
            sender_email: "someemail2@trustpilot.com".to_string(),
            sender_name: "John Doe".to_string(),
            reply_to: "kej@trustpilot.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Tls {
    pub enabled: bool,
    pub cert_file: String,
    pub key_file: String,
}

// ---------------------------------------------- Config ----------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub log_config: String,
    pub trustpilot: Trustpilot,
    pub sender: Sender,
    pub tls: Tls,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3001,
            log_config: "src/configs/log4rs.yaml".to_string(),
            trustpilot: Trustpilot::default(),
            sender: Sender::default(),
            tls: Tls::default(),
        }
    }
}

impl Config {
    pub fn load_config() -> Result<Config, InviteError> {
        let config_path = if metadata("/etc/tp-invite/configs.yaml").is_ok() {
            "/etc/tp-invite/configs.yaml"
        } else {
            "src/configs/configs.yaml"
        };
        let mut contents = String::new();
        File::open(config_path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|err| InviteError::Config(format!("Failed to read {}: {}", config_path, err)))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Config, InviteError> {
        serde_yaml::from_str(contents)
            .map_err(|err| InviteError::Config(format!("Failed to parse config file: {}", err)))
    }
}

// A missing or unreadable file falls back to the built-in defaults
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(|| Config::load_config().unwrap_or_else(|err| {
    eprintln!("{}, using defaults", err);
    Config::default()
}));

// ---------------------------------------------- Credentials ----------------------------------------------
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub business_unit_id: String,
    pub business_user_id: Option<String>,
}

impl Credentials {
    // Read credentials from the environment, after loading a .env file if one is present
    pub fn from_env() -> Result<Credentials, InviteError> {
        dotenv::dotenv().ok();

        Ok(Credentials {
            api_key: required_var("TRUSTPILOT_API_KEY")?,
            api_secret: required_var("TRUSTPILOT_API_SECRET")?,
            business_unit_id: required_var("TRUSTPILOT_BUSINESS_UNIT_ID")?,
            business_user_id: env::var("TRUSTPILOT_BUSINESS_USER_ID").ok().filter(|v| !v.is_empty()),
        })
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("business_unit_id", &self.business_unit_id)
            .field("business_user_id", &self.business_user_id)
            .finish()
    }
}

fn required_var(name: &str) -> Result<String, InviteError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(InviteError::Config(format!("{} is not set", name))),
    }
}
