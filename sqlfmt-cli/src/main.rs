use clap::Parser;
use sqlfmt_cli::{Cli, run, setup_logging};
use tracing::error;

fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("❌ 格式化失败: {:#}", e);
        std::process::exit(1);
    }
}
