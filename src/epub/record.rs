//! 元数据记录

use serde::Serialize;

use crate::epub::ncx::TocEntry;

/// 一本EPUB的提取结果
///
/// 缺失的字段为 `None` 或空列表，不会是空字符串。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// 包文件的版本（如 `2.0`、`3.0`）
    pub format_version: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    /// 作者，去重后保持首次出现的顺序
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    /// 标识符（ISBN、UUID等），保持文档顺序
    pub identifiers: Vec<String>,
    pub subject: Option<String>,
    /// EPUB文件大小（字节）
    pub file_size_bytes: u64,
    /// base64编码的封面图片
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_bytes: Option<String>,
    /// 封面图片扩展名（如 `.jpg`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_extension: Option<String>,
    pub toc: Option<Vec<TocEntry>>,
}
