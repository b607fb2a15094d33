use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("无效的连接目标: {0}")]
    InvalidConnectionTarget(String),

    #[error("无法连接到数据库 {target}: {message}")]
    Connection { target: String, message: String },

    #[error("目录查询失败 {target}: {message}")]
    Query { target: String, message: String },

    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("配置文件未找到")]
    ConfigNotFound,

    #[error("自定义错误: {0}")]
    Custom(String),
}

/// 对外区分的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConnectionTarget,
    Connection,
    Query,
    Other,
}

impl AnalyzerError {
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidConnectionTarget(msg.into())
    }

    pub fn connection(target: impl Into<String>, message: impl ToString) -> Self {
        Self::Connection {
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn query(target: impl Into<String>, message: impl ToString) -> Self {
        Self::Query {
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConnectionTarget(_) => ErrorKind::InvalidConnectionTarget,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Query { .. } => ErrorKind::Query,
            _ => ErrorKind::Other,
        }
    }
}
