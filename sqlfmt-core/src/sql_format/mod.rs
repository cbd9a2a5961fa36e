mod builder;
mod parser;
mod pretty;
mod rewrite;
mod template;
pub mod tree;
mod types;

#[cfg(test)]
mod tests;

use crate::config::FormatOptions;
use crate::error::Result;
use tracing::debug;

// 重新导出公共接口
pub use builder::{build_create_table, build_table};
pub use parser::parse_one_statement;
pub use pretty::pretty;
pub use template::{RenderHelpers, Segments, fmt_type, nullable, render, upper};
pub use types::{
    Column, ForeignKey, Index, IndexColumn, Nullability, ReferentialAction, RowFormat, Table,
    TableOptions,
};

/// 解析 CREATE TABLE 语句并构建表定义
pub fn parse_table(sql: &str) -> Result<Table> {
    let statement = parse_one_statement(sql)?;
    let mut table = build_table(&statement)?;
    table.sql = sql.to_string();
    Ok(table)
}

/// 使用默认选项格式化 CREATE TABLE 语句
pub fn format(sql: &str) -> Result<String> {
    format_with_options(sql, &FormatOptions::default())
}

/// 格式化 CREATE TABLE 语句，输出以分号结尾
pub fn format_with_options(sql: &str, options: &FormatOptions) -> Result<String> {
    let table = parse_table(sql)?;
    let segments = render(&table, &options.helpers);
    debug!("表 {} 的原始片段: {:?}", table.qualified_name(), segments);
    Ok(pretty(&segments, options))
}
