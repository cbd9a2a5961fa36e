/// 排版相关常量
pub mod layout {
    /// 列定义块与索引定义块的缩进宽度
    pub const DEFAULT_INDENT: usize = 4;

    /// 列定义表格中两列之间的最小间距
    pub const DEFAULT_COLUMN_GAP: usize = 2;

    /// 索引/外键定义表格中两列之间的最小间距
    pub const DEFAULT_KEY_GAP: usize = 1;
}

/// 关键字前缀
pub mod keywords {
    /// 索引定义行的关键字前缀，按匹配优先级排列
    pub const KEY_PREFIXES: &[&str] = &[
        "PRIMARY KEY",
        "FULLTEXT INDEX",
        "FULLTEXT KEY",
        "FULLTEXT",
        "UNIQUE INDEX",
        "UNIQUE KEY",
        "UNIQUE",
        "INDEX",
        "KEY",
    ];

    /// 外键定义行固定的第一列
    pub const FOREIGN_KEY: &str = "FOREIGN KEY";

    /// 列类型末尾可能出现的属性，按输出顺序排列
    pub const TYPE_ATTRIBUTES: &[&str] = &["UNSIGNED", "ZEROFILL", "BINARY"];
}

/// 配置文件相关常量
pub mod config {
    /// 按优先级查找的配置文件名
    pub const CONFIG_FILE_NAMES: &[&str] = &["sqlfmt.toml", ".sqlfmt.toml"];
}
