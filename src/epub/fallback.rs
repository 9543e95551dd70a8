//! 辅助页面提取模块
//!
//! 部分出版商不在OPF中填写作者和出版日期，而是写在单独的HTML页面里。
//! 这里从这些页面中提取作者姓名和 "First published:" 日期。

use crate::epub::xml::{Document, ElementRef};

/// 作者列表前的标题文本
const AUTHOR_HEADINGS: [&str; 2] = ["Author", "Authors"];

/// 出版日期段落的前缀
const FIRST_PUBLISHED_MARKER: &str = "First published:";

/// 标题元素的级别（h1 => 1 ... h6 => 6）
fn heading_rank(element: ElementRef<'_>) -> Option<u8> {
    let name = element.local_name().to_ascii_lowercase();
    let rank = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&rank).then_some(rank)
}

fn is_paragraph(element: ElementRef<'_>) -> bool {
    element.local_name().eq_ignore_ascii_case("p")
}

/// 提取作者页中的作者列表
///
/// 找到文本恰好为 "Author" 或 "Authors" 的标题，收集其后的段落文本，
/// 直到遇到同级或更高级的标题为止。
pub fn scrape_authors(page: &Document) -> Vec<String> {
    let mut tags = page.iter_all_tags();

    let marker_rank = tags.by_ref().find_map(|tag| {
        let rank = heading_rank(tag)?;
        AUTHOR_HEADINGS
            .contains(&tag.text_content().trim())
            .then_some(rank)
    });
    let Some(marker_rank) = marker_rank else {
        return Vec::new();
    };

    let mut authors = Vec::new();
    for tag in tags {
        if heading_rank(tag).is_some_and(|rank| rank <= marker_rank) {
            break;
        }
        if is_paragraph(tag) {
            let text = tag.text_content();
            let text = text.trim();
            if !text.is_empty() {
                authors.push(text.to_string());
            }
        }
    }
    authors
}

/// 提取日期页中 "First published:" 之后的日期
pub fn scrape_first_published(page: &Document) -> Option<String> {
    page.iter_all_tags()
        .filter(|tag| is_paragraph(*tag))
        .find_map(|tag| {
            let text = tag.text_content();
            let date = text.trim().strip_prefix(FIRST_PUBLISHED_MARKER)?.trim();
            (!date.is_empty()).then(|| date.to_string())
        })
}
