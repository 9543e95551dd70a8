//! 目录模块
//!
//! 先尝试EPUB 3导航文档，没有结果时再尝试EPUB 2的NCX文件，
//! 最后把目录项展平为带连续编号的列表。

use log::{debug, warn};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::epub::error::Result;
use crate::epub::ncx::navigation::parse_nav_document;
use crate::epub::ncx::parser::parse_ncx_document;
use crate::epub::opf::{PackageDocument, find_nav_item, find_ncx_item};
use crate::epub::reader::Epub;
use crate::epub::xml::Document;

/// 目录项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// 标题（已去除首尾空白，非空）
    pub title: String,
    /// 指向的内容文件，可能带有片段（如 `ch1.html#s2`）
    pub source_reference: String,
    /// 层级，0为最顶层
    pub level: u32,
    /// 在目录中的位置，从0开始连续编号
    pub index: usize,
}

impl Display for TocEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let indent = "  ".repeat(self.level as usize);
        write!(f, "{}{} ({})", indent, self.title, self.source_reference)
    }
}

/// 为目录项编号；没有目录项时返回 `None`
pub fn finalize(mut entries: Vec<TocEntry>) -> Option<Vec<TocEntry>> {
    if entries.is_empty() {
        return None;
    }
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.index = index;
    }
    Some(entries)
}

/// 从导航文档或NCX文件中提取目录
///
/// # 返回值
/// * `Result<Option<Vec<TocEntry>>, EpubError>` - 两种来源都没有目录项时返回 `Ok(None)`；
///   清单中列出的目录文件不在压缩包中时返回 `MissingEntry`
pub fn discover_toc(epub: &mut Epub, package: &PackageDocument) -> Result<Option<Vec<TocEntry>>> {
    let document = package.document();

    let mut entries = Vec::new();
    if let Some(href) = find_nav_item(document) {
        let path = package.resolve(href);
        let content = epub.read(&path)?;
        entries = parse_nav_document(&Document::parse_markup(&content));
        debug!("导航文档 {} 中找到 {} 个目录项", path, entries.len());
    }

    if entries.is_empty() {
        if let Some(href) = find_ncx_item(document) {
            let path = package.resolve(href);
            let content = epub.read(&path)?;
            match Document::parse_xml(&content) {
                Ok(ncx) => {
                    entries = parse_ncx_document(&ncx);
                    debug!("NCX文件 {} 中找到 {} 个目录项", path, entries.len());
                }
                Err(e) => warn!("无法解析NCX文件 {}: {}", path, e),
            }
        }
    }

    Ok(finalize(entries))
}
