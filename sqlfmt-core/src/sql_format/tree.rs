//! 解析后的语句树
//!
//! parser 模块把 sqlparser 的 AST 转换为这里的结构，builder 模块只依赖这里的类型。
//! 各类选项都是封闭的枚举集合，按声明顺序保存。

/// 一条 SQL 语句
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    /// 其它语句，保存语句关键字用于报错
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTableStmt {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<ColumnNode>,
    pub constraints: Vec<Constraint>,
    pub options: Vec<TableOption>,
}

/// 列类型上的标志位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFlags {
    pub unsigned: bool,
    pub zerofill: bool,
    pub binary: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnNode {
    pub name: String,
    pub type_spec: String,
    pub flags: TypeFlags,
    pub options: Vec<ColumnOption>,
}

/// DEFAULT / ON UPDATE 的取值
#[derive(Debug, Clone, PartialEq)]
pub enum OptionExpr {
    /// 字面量，保存其 SQL 文本
    Literal(String),
    /// 函数调用，保存函数名
    FunctionCall(String),
    Other,
}

/// 列级选项
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOption {
    NoOption,
    PrimaryKey,
    NotNull,
    Null,
    AutoIncrement,
    DefaultValue(OptionExpr),
    Unique,
    UniqueKey,
    UniqueIndex,
    Index,
    Key,
    Fulltext,
    Comment(String),
    OnUpdate(OptionExpr),
    Charset(String),
    Collate(String),
    /// 生成列表达式，保存 `AS (expr) [VIRTUAL|STORED]` 文本
    Generated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    NoConstraint,
    PrimaryKey,
    Key,
    Index,
    Unique,
    UniqueKey,
    UniqueIndex,
    Fulltext,
    ForeignKey,
}

/// 索引中的一列，length 为显式指定的前缀长度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    pub column: String,
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferOption {
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

/// 外键的 REFERENCES 部分
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub schema: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub on_update: Option<ReferOption>,
    pub on_delete: Option<ReferOption>,
}

/// 表级约束
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub name: String,
    pub keys: Vec<KeyPart>,
    /// 仅外键约束有值
    pub refer: Option<Reference>,
}

/// 表级选项
#[derive(Debug, Clone, PartialEq)]
pub enum TableOption {
    None,
    Engine(String),
    Charset(String),
    Collate(String),
    AutoIncrement(u64),
    Comment(String),
    AvgRowLength(u64),
    CheckSum(u64),
    Compression(String),
    Connection(String),
    Password(String),
    KeyBlockSize(u64),
    MaxRows(u64),
    MinRows(u64),
    DelayKeyWrite(u64),
    /// ROW_FORMAT 的原始关键字
    RowFormat(String),
    StatsPersistent,
}
