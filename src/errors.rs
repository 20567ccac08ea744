use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum EdgelinkError {
    Validation(String),
    Unauthorized(String),
    NotFound(String),
    CodeExhausted(String),
    Configuration(String),
    Decryption(String),
    StorageOperation(String),
    Serialization(String),
}

impl EdgelinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            EdgelinkError::Validation(_) => "E001",
            EdgelinkError::Unauthorized(_) => "E002",
            EdgelinkError::NotFound(_) => "E003",
            EdgelinkError::CodeExhausted(_) => "E004",
            EdgelinkError::Configuration(_) => "E005",
            EdgelinkError::Decryption(_) => "E006",
            EdgelinkError::StorageOperation(_) => "E007",
            EdgelinkError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            EdgelinkError::Validation(_) => "Validation Error",
            EdgelinkError::Unauthorized(_) => "Unauthorized",
            EdgelinkError::NotFound(_) => "Resource Not Found",
            EdgelinkError::CodeExhausted(_) => "Short Code Space Exhausted",
            EdgelinkError::Configuration(_) => "Configuration Error",
            EdgelinkError::Decryption(_) => "Decryption Error",
            EdgelinkError::StorageOperation(_) => "Storage Operation Error",
            EdgelinkError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            EdgelinkError::Validation(msg)
            | EdgelinkError::Unauthorized(msg)
            | EdgelinkError::NotFound(msg)
            | EdgelinkError::CodeExhausted(msg)
            | EdgelinkError::Configuration(msg)
            | EdgelinkError::Decryption(msg)
            | EdgelinkError::StorageOperation(msg)
            | EdgelinkError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the router answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgelinkError::Validation(_) | EdgelinkError::Decryption(_) => StatusCode::BAD_REQUEST,
            EdgelinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EdgelinkError::NotFound(_) => StatusCode::NOT_FOUND,
            EdgelinkError::CodeExhausted(_)
            | EdgelinkError::Configuration(_)
            | EdgelinkError::StorageOperation(_)
            | EdgelinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EdgelinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EdgelinkError {}

// 便捷的构造函数
impl EdgelinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::NotFound(msg.into())
    }

    pub fn code_exhausted<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::CodeExhausted(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::Configuration(msg.into())
    }

    pub fn decryption<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::Decryption(msg.into())
    }

    pub fn storage_operation<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::StorageOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        EdgelinkError::Serialization(msg.into())
    }
}

impl From<redis::RedisError> for EdgelinkError {
    fn from(err: redis::RedisError) -> Self {
        EdgelinkError::StorageOperation(err.to_string())
    }
}

impl From<std::io::Error> for EdgelinkError {
    fn from(err: std::io::Error) -> Self {
        EdgelinkError::StorageOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EdgelinkError {
    fn from(err: serde_json::Error) -> Self {
        EdgelinkError::Serialization(err.to_string())
    }
}

impl From<crate::crypto::CipherError> for EdgelinkError {
    fn from(err: crate::crypto::CipherError) -> Self {
        if err.is_configuration() {
            EdgelinkError::Configuration(err.to_string())
        } else if matches!(err, crate::crypto::CipherError::InvalidUrl) {
            EdgelinkError::Validation(err.to_string())
        } else {
            EdgelinkError::Decryption(err.to_string())
        }
    }
}

impl From<crate::api::jwt::AuthError> for EdgelinkError {
    fn from(err: crate::api::jwt::AuthError) -> Self {
        EdgelinkError::Unauthorized(err.public_message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdgelinkError>;
