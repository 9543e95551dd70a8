//! 提取选项配置模块
//!
//! 提供元数据提取的选项，支持从YAML文件加载配置。

use crate::epub::error::{EpubError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 默认的作者辅助页面
pub const DEFAULT_AUTHOR_PAGE: &str = "OEBPS/author.html";

/// 默认的版权（出版日期）辅助页面
pub const DEFAULT_DATE_PAGE: &str = "OEBPS/copyright.html";

/// 元数据提取选项
///
/// YAML中缺少的字段使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// 是否读取封面图片
    pub read_cover_image: bool,
    /// 是否提取目录
    pub read_toc: bool,
    /// OPF中没有作者时使用的辅助页面（压缩包内路径）
    pub author_page: String,
    /// OPF中没有出版日期时使用的辅助页面（压缩包内路径）
    pub date_page: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            read_cover_image: true,
            read_toc: true,
            author_page: DEFAULT_AUTHOR_PAGE.to_string(),
            date_page: DEFAULT_DATE_PAGE.to_string(),
        }
    }
}

impl ExtractOptions {
    /// 只指定封面和目录开关，其余使用默认值
    pub fn new(read_cover_image: bool, read_toc: bool) -> Self {
        Self {
            read_cover_image,
            read_toc,
            ..Self::default()
        }
    }

    /// 从YAML文本解析选项
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 从YAML文件加载选项
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 文件无法读取或格式错误时返回 `ConfigError`
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use epub_meta::ExtractOptions;
    /// let options = ExtractOptions::from_file("epub-meta.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;
        Self::from_yaml_str(&content)
    }
}
