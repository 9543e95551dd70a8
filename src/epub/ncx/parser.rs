//! NCX解析器模块
//!
//! 从EPUB 2的NCX导航控制文件的 `navMap` 中提取目录项。

use crate::epub::ncx::TocEntry;
use crate::epub::xml::{Document, ElementRef};

/// 元素名是否为 `name` 或 `ncx:name`
fn is_named(element: ElementRef<'_>, name: &str) -> bool {
    let full = element.name();
    full == name || full.strip_prefix("ncx:") == Some(name)
}

fn child_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element.child_elements().find(|child| is_named(*child, name))
}

/// 导航点标题：`navLabel/text` 的首个文本子节点
fn nav_point_title(nav_point: ElementRef<'_>) -> Option<String> {
    let text = child_named(nav_point, "navLabel")
        .and_then(|label| child_named(label, "text"))
        .and_then(|text| text.first_text())?
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// 导航点指向的内容：`content` 元素的 `src` 属性
fn nav_point_source(nav_point: ElementRef<'_>) -> String {
    child_named(nav_point, "content")
        .and_then(|content| content.attr("src"))
        .unwrap_or_default()
        .to_string()
}

/// 按前序深度优先顺序展开 `navMap` 中的导航点
///
/// 没有标题的导航点不输出，但仍会展开其子导航点，层级按实际嵌套深度计算。
/// 返回的目录项 `index` 尚未编号。
pub fn parse_ncx_document(document: &Document) -> Vec<TocEntry> {
    let Some(nav_map) = document
        .iter_all_tags()
        .find(|element| is_named(*element, "navMap"))
    else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut stack: Vec<(ElementRef<'_>, u32)> = nav_map
        .child_elements()
        .filter(|child| is_named(*child, "navPoint"))
        .map(|child| (child, 0))
        .collect();
    stack.reverse();

    while let Some((nav_point, level)) = stack.pop() {
        if let Some(title) = nav_point_title(nav_point) {
            entries.push(TocEntry {
                title,
                source_reference: nav_point_source(nav_point),
                level,
                index: 0,
            });
        }

        let children: Vec<_> = nav_point
            .child_elements()
            .filter(|child| is_named(*child, "navPoint"))
            .collect();
        stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
    }

    entries
}
