//! EPUB 3 导航文档解析
//!
//! 从导航文档（`properties="nav"` 的XHTML）中的链接生成目录项，
//! 层级由链接外层 `ol` 元素的数量决定。

use crate::epub::ncx::TocEntry;
use crate::epub::xml::{Document, ElementRef};

/// 计算层级时最多向上查找的祖先数量，防止异常嵌套导致无界遍历
pub const MAX_ANCESTOR_STEPS: usize = 50;

/// 链接必须指向的内容文件类型（子串匹配）
const CONTENT_SUFFIXES: [&str; 2] = [".html", ".xhtml"];

/// 从导航文档中按文档顺序提取目录项
///
/// 返回的目录项 `index` 尚未编号。
pub fn parse_nav_document(document: &Document) -> Vec<TocEntry> {
    document
        .elements_by_tag_name("a")
        .filter_map(|anchor| {
            let href = anchor.attr("href")?;
            if !CONTENT_SUFFIXES.iter().any(|suffix| href.contains(suffix)) {
                return None;
            }
            let title = anchor_title(anchor)?;
            Some(TocEntry {
                title,
                source_reference: href.to_string(),
                level: anchor_level(anchor),
                index: 0,
            })
        })
        .collect()
}

/// 链接标题：首个文本子节点；为空时取第一个子元素的首个文本子节点
fn anchor_title(anchor: ElementRef<'_>) -> Option<String> {
    let direct = anchor.first_text().map(str::trim).unwrap_or("");
    let title = if direct.is_empty() {
        anchor
            .child_elements()
            .next()
            .and_then(|child| child.first_text())
            .map(str::trim)
            .unwrap_or("")
    } else {
        direct
    };
    (!title.is_empty()).then(|| title.to_string())
}

/// 链接的层级：`nav` 之内外层 `ol` 的数量减一，最小为0
fn anchor_level(anchor: ElementRef<'_>) -> u32 {
    let mut depth: i64 = -1;
    let mut current = anchor.parent();
    let mut steps = 0;

    while let Some(element) = current {
        if steps >= MAX_ANCESTOR_STEPS || element.local_name() == "nav" {
            break;
        }
        if element.local_name() == "ol" {
            depth += 1;
        }
        current = element.parent();
        steps += 1;
    }

    u32::try_from(depth.max(0)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="ch01.xhtml">Chapter 1</a>
        <ol>
          <li><a href="ch01.xhtml#s1">
            <span>Section 1.1</span></a></li>
          <li><a href="ch01.xhtml#s2">   </a></li>
        </ol>
      </li>
      <li><a href="ch02.html"> Chapter 2 </a></li>
      <li><a href="notes.txt">Notes</a></li>
      <li><a>No link</a></li>
    </ol>
  </nav>
</body>
</html>"#;

    #[test]
    fn test_parse_nav_document() {
        let document = Document::parse_markup(NAV.as_bytes());
        let entries = parse_nav_document(&document);

        let summary: Vec<(&str, &str, u32)> = entries
            .iter()
            .map(|e| (e.title.as_str(), e.source_reference.as_str(), e.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Chapter 1", "ch01.xhtml", 0),
                ("Section 1.1", "ch01.xhtml#s1", 1),
                ("Chapter 2", "ch02.html", 0),
            ]
        );
    }

    #[test]
    fn test_anchor_title_entities_are_decoded() {
        let document = Document::parse_markup(
            br#"<html><body><nav><ol><li><a href="c1.xhtml">Tom &amp; Jerry&nbsp;I&nbsp;</a></li></ol></nav></body></html>"#,
        );
        let entries = parse_nav_document(&document);
        assert_eq!(entries[0].title, "Tom & Jerry\u{a0}I");
    }

    #[test]
    fn test_anchor_outside_list_is_level_zero() {
        let document = Document::parse_markup(
            br#"<html><body><nav><a href="cover.xhtml">Cover</a></nav></body></html>"#,
        );
        let entries = parse_nav_document(&document);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, 0);
    }

    #[test]
    fn test_level_counting_stops_at_nav() {
        let document = Document::parse_markup(
            br#"<html><body><ol><li><ol><li>
<nav><ol><li><a href="a.xhtml">A</a></li></ol></nav>
</li></ol></li></ol></body></html>"#,
        );
        let entries = parse_nav_document(&document);
        assert_eq!(entries[0].level, 0);
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let mut xml = String::from("<nav>");
        for _ in 0..200 {
            xml.push_str("<ol>");
        }
        xml.push_str(r#"<li><a href="deep.xhtml">Deep</a></li>"#);
        for _ in 0..200 {
            xml.push_str("</ol>");
        }
        xml.push_str("</nav>");

        let document = Document::parse_xml(xml.as_bytes()).unwrap();
        let entries = parse_nav_document(&document);

        // li + 49个ol
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, 48);
    }

    #[test]
    fn test_malformed_nav_falls_back_to_html() {
        let document = Document::parse_markup(
            br#"<html><body><nav><ol><li><a href="c1.xhtml">One</a><li><a href="c2.xhtml">Two</a></ol></nav>"#,
        );
        let titles: Vec<String> = parse_nav_document(&document)
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }
}
