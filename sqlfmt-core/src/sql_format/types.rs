use serde::Serialize;

/// 列的可空性，未声明时不输出任何子句
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Nullability {
    #[default]
    Unspecified,
    NotNull,
    Null,
}

/// 表列定义
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub type_spec: String,
    /// 从 1 开始的声明序号
    pub ordinal: usize,
    pub nullable: Nullability,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    /// UNSIGNED / ZEROFILL / BINARY，按固定顺序以空格连接
    pub attribute: String,
    pub charset: Option<String>,
    pub collate: Option<String>,
    /// 生成列表达式
    pub generated: Option<String>,
    pub default_value: Option<String>,
    pub on_update: Option<String>,
    pub comment: Option<String>,
}

/// 索引中的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    pub name: String,
    /// 前缀长度，None 表示未显式指定
    pub prefix_length: Option<u32>,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix_length: None,
        }
    }
}

/// 表索引定义
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Index {
    /// 匿名主键时为空
    pub name: String,
    pub primary: bool,
    pub unique: bool,
    pub fulltext: bool,
    pub columns: Vec<IndexColumn>,
}

/// 外键引用动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    NoAction,
    SetNull,
    Restrict,
    Cascade,
}

impl ReferentialAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
        }
    }
}

/// 外键定义
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub ref_schema: Option<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_update: Option<ReferentialAction>,
    pub on_delete: Option<ReferentialAction>,
}

/// ROW_FORMAT 表选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowFormat {
    Default,
    Dynamic,
    Fixed,
    Compressed,
    Redundant,
    Compact,
}

impl RowFormat {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEFAULT" => Some(RowFormat::Default),
            "DYNAMIC" => Some(RowFormat::Dynamic),
            "FIXED" => Some(RowFormat::Fixed),
            "COMPRESSED" => Some(RowFormat::Compressed),
            "REDUNDANT" => Some(RowFormat::Redundant),
            "COMPACT" => Some(RowFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowFormat::Default => "DEFAULT",
            RowFormat::Dynamic => "DYNAMIC",
            RowFormat::Fixed => "FIXED",
            RowFormat::Compressed => "COMPRESSED",
            RowFormat::Redundant => "REDUNDANT",
            RowFormat::Compact => "COMPACT",
        }
    }
}

/// 表级选项，未在原语句中出现的项保持 None
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableOptions {
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collate: Option<String>,
    pub row_format: Option<RowFormat>,
    pub avg_row_length: Option<u64>,
    pub key_block_size: Option<u64>,
    pub min_rows: Option<u64>,
    pub max_rows: Option<u64>,
    pub auto_increment: Option<u64>,
    pub comment: Option<String>,
}

/// 表定义
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<Column>,
    pub indices: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub options: TableOptions,
    /// 原始 SQL 文本
    #[serde(skip)]
    pub sql: String,
}

impl Table {
    /// 带 schema 前缀的表名
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// 按名称查找列，忽略引号和大小写
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| same_identifier(&c.name, name))
    }
}

/// 比较两个标识符，忽略引号和 ASCII 大小写
fn same_identifier(a: &str, b: &str) -> bool {
    unquote_identifier(a).eq_ignore_ascii_case(unquote_identifier(b))
}

fn unquote_identifier(s: &str) -> &str {
    let s = s.trim();
    for quote in ['`', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
