use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default Google OAuth 2.0 authorization endpoint used when `GOOGLE_AUTH_URL` is not set.
pub const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Default Google OAuth 2.0 token endpoint used when `GOOGLE_TOKEN_URL` is not set.
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default People API base URL used when `GOOGLE_PEOPLE_BASE_URL` is not set.
pub const DEFAULT_GOOGLE_PEOPLE_BASE_URL: &str = "https://people.googleapis.com/v1";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The OAuth client ID issued by Google for this application.
    #[arg(long, env)]
    google_client_id: Option<String>,

    /// The OAuth client secret issued by Google for this application.
    #[arg(long, env, hide_env_values = true)]
    google_client_secret: Option<String>,

    /// Google's OAuth 2.0 authorization endpoint.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_AUTH_URL)]
    google_auth_url: String,

    /// Google's OAuth 2.0 token endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_TOKEN_URL)]
    google_token_url: String,

    /// The base URL of the Google People API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_PEOPLE_BASE_URL)]
    google_people_base_url: String,

    /// The externally visible base URL of this service (e.g. https://contacts.example.com).
    /// Used to build the OAuth callback URL; when unset it is derived from the request's Host header.
    #[arg(long, env)]
    public_base_url: Option<String>,

    /// Timeout in seconds for every outbound call to Google
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Seconds a started login may wait for its OAuth callback
    #[arg(long, env, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..=86_400))]
    pub login_state_ttl_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 5000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// Session expiry duration in seconds (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400)]
    pub backend_session_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Google OAuth client ID, if configured.
    pub fn google_client_id(&self) -> Option<String> {
        self.google_client_id.clone()
    }

    /// Returns the Google OAuth client secret, if configured.
    pub fn google_client_secret(&self) -> Option<String> {
        self.google_client_secret.clone()
    }

    pub fn set_google_credentials(mut self, client_id: String, client_secret: String) -> Self {
        self.google_client_id = Some(client_id);
        self.google_client_secret = Some(client_secret);
        self
    }

    pub fn google_auth_url(&self) -> &str {
        &self.google_auth_url
    }

    pub fn google_token_url(&self) -> &str {
        &self.google_token_url
    }

    /// Returns the People API base URL.
    pub fn google_people_base_url(&self) -> &str {
        &self.google_people_base_url
    }

    /// Points every Google endpoint at `base_url`, as a mock server would serve them.
    pub fn set_google_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.google_auth_url = format!("{base_url}/o/oauth2/auth");
        self.google_token_url = format!("{base_url}/token");
        self.google_people_base_url = format!("{base_url}/v1");
        self
    }

    /// Returns the configured public base URL of this service, if any.
    pub fn public_base_url(&self) -> Option<String> {
        self.public_base_url.clone()
    }

    pub fn set_public_base_url(mut self, public_base_url: String) -> Self {
        self.public_base_url = Some(public_base_url);
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
