use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 与环境变量加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、CPU 数量、对外地址
/// - storage: KV 存储后端
/// - crypto: 加密链接密钥
/// - auth: Bearer token 校验
/// - cors: 跨域白名单
/// - api: 健康检查 token
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prefix for environment overrides, e.g. `EDGELINK__CRYPTO__ENCRYPTION_KEY`
pub const ENV_PREFIX: &str = "EDGELINK";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    /// ENV 前缀：EDGELINK，分隔符：__
    /// 文件存在但解析失败时返回错误，不回退到默认值
    pub fn try_load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Origin used for `shortUrl` / `encryptedUrl`; derived from the request when empty
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_base_url: String::new(),
            environment: default_environment(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `redis` | `memory`
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default)]
    pub redis_url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            redis_url: String::new(),
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CryptoConfig {
    /// base64 / base64url of 16, 24 or 32 raw bytes; checked lazily on first use
    #[serde(default)]
    pub encryption_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_project_id")]
    pub project_id: String,
    /// RS256 signature check against `jwks_url`; `false` falls back to claims only
    #[serde(default = "default_verify_signature")]
    pub verify_signature: bool,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            verify_signature: default_verify_signature(),
            jwks_url: default_jwks_url(),
            jwks_cache_secs: default_jwks_cache_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 逗号分隔的 Origin 白名单，`*` 表示任意
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// `/healthz` 需要的 `?t=` token，为空时不校验
    #[serde(default)]
    pub health_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` | `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8787
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_key_prefix() -> String {
    "edgelink:".to_string()
}

fn default_project_id() -> String {
    "krizpay-1d84a".to_string()
}

fn default_verify_signature() -> bool {
    true
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_jwks_cache_secs() -> u64 {
    3600
}

fn default_allowed_origins() -> String {
    "*".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}
