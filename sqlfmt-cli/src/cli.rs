use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sqlfmt")]
#[command(about = "MySQL CREATE TABLE 语句格式化工具")]
#[command(version)]
#[command(
    long_about = "读取一条 MySQL CREATE TABLE 语句，输出列定义与索引定义分别对齐的格式化结果。\n未指定文件时从标准输入读取。"
)]
pub struct Cli {
    /// 待格式化的 SQL 文件，省略时读取标准输入
    pub file: Option<PathBuf>,

    /// 配置文件路径，省略时在当前目录查找 sqlfmt.toml 或 .sqlfmt.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    /// 输出解析后的表结构 (JSON)，而不是格式化后的 SQL
    #[arg(long)]
    pub model: bool,
}
