use crate::constants::{config, layout};
use crate::error::Result;
use crate::sql_format::RenderHelpers;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 格式化选项
///
/// 所有字段都有默认值，配置文件中只需写出需要覆盖的项：
///
/// ```toml
/// indent = 2
/// column_gap = 3
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// 定义块的缩进宽度
    pub indent: usize,
    /// 列定义表格的列间距
    pub column_gap: usize,
    /// 索引/外键定义表格的列间距
    pub key_gap: usize,
    /// 模板渲染使用的辅助函数
    #[serde(skip)]
    pub helpers: RenderHelpers,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: layout::DEFAULT_INDENT,
            column_gap: layout::DEFAULT_COLUMN_GAP,
            key_gap: layout::DEFAULT_KEY_GAP,
            helpers: RenderHelpers::default(),
        }
    }
}

impl FormatOptions {
    /// 在当前目录按优先级查找配置文件：sqlfmt.toml -> .sqlfmt.toml
    /// 找不到时使用默认配置
    pub fn find_and_load() -> Result<Self> {
        for config_file in config::CONFIG_FILE_NAMES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        tracing::debug!("未找到配置文件，使用默认格式化选项");
        Ok(Self::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let options: FormatOptions = toml::from_str(&content)?;

        Ok(options)
    }
}
