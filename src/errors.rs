use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinkforgeError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    UrlParse(String),
    SlugExhausted(String),
}

impl LinkforgeError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkforgeError::DatabaseConfig(_) => "E001",
            LinkforgeError::DatabaseConnection(_) => "E002",
            LinkforgeError::DatabaseOperation(_) => "E003",
            LinkforgeError::FileOperation(_) => "E004",
            LinkforgeError::Validation(_) => "E005",
            LinkforgeError::UrlParse(_) => "E006",
            LinkforgeError::SlugExhausted(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkforgeError::DatabaseConfig(_) => "Database Configuration Error",
            LinkforgeError::DatabaseConnection(_) => "Database Connection Error",
            LinkforgeError::DatabaseOperation(_) => "Database Operation Error",
            LinkforgeError::FileOperation(_) => "File Operation Error",
            LinkforgeError::Validation(_) => "Validation Error",
            LinkforgeError::UrlParse(_) => "URL Parse Error",
            LinkforgeError::SlugExhausted(_) => "Slug Allocation Error",
        }
    }

    /// 获取错误详情
    ///
    /// HTTP 500 响应体直接使用这里的文本。
    pub fn message(&self) -> &str {
        match self {
            LinkforgeError::DatabaseConfig(msg) => msg,
            LinkforgeError::DatabaseConnection(msg) => msg,
            LinkforgeError::DatabaseOperation(msg) => msg,
            LinkforgeError::FileOperation(msg) => msg,
            LinkforgeError::Validation(msg) => msg,
            LinkforgeError::UrlParse(msg) => msg,
            LinkforgeError::SlugExhausted(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkforgeError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时打印到终端）
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

impl fmt::Display for LinkforgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkforgeError {}

// 便捷的构造函数
impl LinkforgeError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::Validation(msg.into())
    }

    pub fn url_parse<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::UrlParse(msg.into())
    }

    pub fn slug_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::SlugExhausted(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkforgeError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkforgeError::DatabaseOperation(err.to_string())
    }
}

impl From<url::ParseError> for LinkforgeError {
    fn from(err: url::ParseError) -> Self {
        LinkforgeError::UrlParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkforgeError>;
