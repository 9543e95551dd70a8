//! 清单模块
//!
//! 在OPF清单中定位封面图片、导航文档（EPUB 3）和NCX文件（EPUB 2）。

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::debug;

use crate::epub::error::Result;
use crate::epub::opf::PackageDocument;
use crate::epub::reader::Epub;
use crate::epub::xml::{Document, find_image_tag, find_tag};

/// 封面图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// base64编码（标准字母表，带填充）的图片内容
    pub content: String,
    /// 扩展名，包含点号（如 `.jpg`）
    pub extension: String,
}

/// 在清单中查找封面图片，返回相对于OPF的href与扩展名
///
/// 依次尝试，先匹配者胜出：
/// 1. `<meta name="cover" content="ID"/>` 指向的清单项
/// 2. id为 `cover-image` 的清单项
/// 3. id为 `cover` 的清单项
///
/// 每种方式都要求清单项的href是图片。
pub fn locate_cover_image(document: &Document) -> Option<(String, String)> {
    let from_meta = find_tag(document, "meta", "name", "cover")
        .and_then(|meta| meta.attr("content"))
        .and_then(|id| find_image_tag(document, "item", "id", id));
    if from_meta.is_some() {
        debug!("通过meta cover找到封面");
        return from_meta;
    }

    ["cover-image", "cover"].iter().find_map(|id| {
        let found = find_image_tag(document, "item", "id", id);
        if found.is_some() {
            debug!("通过清单项 {} 找到封面", id);
        }
        found
    })
}

/// 读取封面图片并进行base64编码
///
/// # 返回值
/// * `Result<Option<CoverImage>, EpubError>` - 没有封面时返回 `Ok(None)`；
///   清单指向的文件不在压缩包中时返回 `MissingEntry`
pub fn discover_cover_image(
    epub: &mut Epub,
    package: &PackageDocument,
) -> Result<Option<CoverImage>> {
    let Some((href, extension)) = locate_cover_image(package.document()) else {
        return Ok(None);
    };

    let path = package.resolve(&href);
    let bytes = epub.read(&path)?;
    Ok(Some(CoverImage {
        content: STANDARD.encode(bytes),
        extension,
    }))
}

/// 查找EPUB 3导航文档的href
///
/// `properties` 按空白分隔，包含 `nav` 即可。
pub fn find_nav_item(document: &Document) -> Option<&str> {
    document
        .elements_by_tag_name("item")
        .filter(|item| {
            item.attr("properties")
                .is_some_and(|properties| properties.split_whitespace().any(|p| p == "nav"))
        })
        .find_map(|item| item.attr("href"))
}

/// 查找EPUB 2 NCX文件的href
///
/// 依次尝试id为 `ncx`、`ncxtoc` 的清单项，以及 `spine` 的 `toc` 属性指向的清单项。
pub fn find_ncx_item(document: &Document) -> Option<&str> {
    let spine_toc = document
        .elements_by_tag_name("spine")
        .next()
        .and_then(|spine| spine.attr("toc"));

    ["ncx", "ncxtoc"]
        .into_iter()
        .chain(spine_toc)
        .find_map(|id| find_tag(document, "item", "id", id).and_then(|item| item.attr("href")))
}
