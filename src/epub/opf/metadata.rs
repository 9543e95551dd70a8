//! 元数据字段提取模块
//!
//! 每个字段一个纯函数，统一采用"先查无前缀标签，再查 `dc:` 前缀标签"的查找策略。
//! 只尝试这两种写法；使用其他命名空间前缀的书籍会得到 `None`。

use crate::epub::fallback;
use crate::epub::xml::{Document, NodeRef};
use std::collections::HashSet;

/// 查找第一个匹配元素的首个文本子节点，去除首尾空白
fn first_child_text(document: &Document, tag_name: &str) -> Option<String> {
    let element = document.elements_by_tag_name(tag_name).next()?;
    match element.first_child()? {
        NodeRef::Text(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        NodeRef::Element(_) => None,
    }
}

/// 所有带文本子节点的匹配元素的文本，保持文档顺序
fn all_child_texts(document: &Document, tag_name: &str) -> Vec<String> {
    document
        .elements_by_tag_name(tag_name)
        .filter_map(|element| element.first_text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

/// 单值Dublin Core字段：`name` 没有结果时再查 `dc:name`
pub fn discover_dc(document: &Document, name: &str) -> Option<String> {
    first_child_text(document, name).or_else(|| first_child_text(document, &format!("dc:{}", name)))
}

/// 多值Dublin Core字段：`name` 没有结果时再查 `dc:name`
pub fn discover_dc_all(document: &Document, name: &str) -> Vec<String> {
    let values = all_child_texts(document, name);
    if !values.is_empty() {
        return values;
    }
    all_child_texts(document, &format!("dc:{}", name))
}

pub fn discover_title(document: &Document) -> Option<String> {
    discover_dc(document, "title")
}

pub fn discover_language(document: &Document) -> Option<String> {
    discover_dc(document, "language")
}

pub fn discover_publisher(document: &Document) -> Option<String> {
    discover_dc(document, "publisher")
}

pub fn discover_subject(document: &Document) -> Option<String> {
    discover_dc(document, "subject")
}

/// 标识符（ISBN、UUID等），保持文档顺序
pub fn discover_identifiers(document: &Document) -> Vec<String> {
    discover_dc_all(document, "identifier")
}

/// 获取作者列表
///
/// OPF中没有 `creator` 时，从作者辅助页面的 "Author"/"Authors" 标题下提取。
/// 结果去重，保留首次出现的顺序。
///
/// # 参数
/// * `document` - OPF文档
/// * `author_page` - 可选的作者辅助页面
pub fn discover_authors(document: &Document, author_page: Option<&Document>) -> Vec<String> {
    let mut authors = discover_dc_all(document, "creator");
    if authors.is_empty() {
        if let Some(page) = author_page {
            authors = fallback::scrape_authors(page);
        }
    }
    dedup_preserving_order(authors)
}

/// 获取出版日期
///
/// OPF中没有 `date` 时，从日期辅助页面中 "First published:" 开头的段落提取。
pub fn discover_publication_date(
    document: &Document,
    date_page: Option<&Document>,
) -> Option<String> {
    discover_dc(document, "date").or_else(|| date_page.and_then(fallback::scrape_first_published))
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
