use thiserror::Error;

pub type Result<T> = std::result::Result<T, SqlFmtError>;

#[derive(Error, Debug)]
pub enum SqlFmtError {
    #[error("SQL 解析错误: {0}")]
    Parse(String),

    #[error("不支持的 SQL 语句: {0}，仅支持 CREATE TABLE")]
    UnsupportedStatement(String),

    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

// 为 sqlparser 解析错误实现 From trait
impl From<sqlparser::parser::ParserError> for SqlFmtError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        SqlFmtError::Parse(err.to_string())
    }
}

impl From<sqlparser::tokenizer::TokenizerError> for SqlFmtError {
    fn from(err: sqlparser::tokenizer::TokenizerError) -> Self {
        SqlFmtError::Parse(err.to_string())
    }
}

impl SqlFmtError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedStatement(kind.into())
    }
}
