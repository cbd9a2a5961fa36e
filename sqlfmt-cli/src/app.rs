use crate::cli::Cli;
use anyhow::{Context, Result};
use sqlfmt_core::{FormatOptions, format_with_options, parse_table};
use std::fs;
use std::io::{self, Read};
use tracing::{debug, info};

/// 执行一次格式化，结果写到 stdout
pub fn run(cli: &Cli) -> Result<()> {
    let sql = read_input(cli)?;
    let output = render_output(cli, &sql)?;
    println!("{output}");
    Ok(())
}

/// 根据命令行参数生成输出文本，不含末尾换行
pub fn render_output(cli: &Cli, sql: &str) -> Result<String> {
    if cli.model {
        let table = parse_table(sql)?;
        info!("解析表结构: {}", table.qualified_name());
        return serde_json::to_string_pretty(&table).context("序列化表结构失败");
    }

    let options = load_options(cli)?;
    debug!("格式化选项: {:?}", options);
    Ok(format_with_options(sql, &options)?)
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => {
            debug!("读取 SQL 文件: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("读取 SQL 文件失败: {}", path.display()))
        }
        None => {
            debug!("从标准输入读取 SQL");
            let mut sql = String::new();
            io::stdin()
                .read_to_string(&mut sql)
                .context("读取标准输入失败")?;
            Ok(sql)
        }
    }
}

fn load_options(cli: &Cli) -> Result<FormatOptions> {
    match &cli.config {
        Some(path) => FormatOptions::load_from_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display())),
        None => FormatOptions::find_and_load().context("加载配置文件失败"),
    }
}
