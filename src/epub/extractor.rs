//! 元数据提取流程
//!
//! 打开压缩包，经由container.xml找到包文件，依次运行各字段提取、封面定位与目录提取，
//! 汇总为一个 `MetadataRecord`。

use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::epub::config::ExtractOptions;
use crate::epub::error::Result;
use crate::epub::ncx::discover_toc;
use crate::epub::opf::{
    discover_authors, discover_cover_image, discover_format_version,
    discover_identifiers, discover_language, discover_publication_date, discover_publisher,
    discover_subject, discover_title,
};
use crate::epub::reader::Epub;
use crate::epub::record::MetadataRecord;
use crate::epub::xml::Document;

/// 提取EPUB的元数据
///
/// # 参数
/// * `path` - epub文件的路径
/// * `read_cover_image` - 是否读取并编码封面图片
/// * `read_toc` - 是否提取目录
///
/// # 返回值
/// * `Result<MetadataRecord, EpubError>` - 不是zip压缩包时返回 `InvalidArchive`；
///   container.xml、包文件或清单引用的文件缺失时返回 `MissingEntry`
pub fn get_metadata<P: AsRef<Path>>(
    path: P,
    read_cover_image: bool,
    read_toc: bool,
) -> Result<MetadataRecord> {
    get_metadata_with_options(path, &ExtractOptions::new(read_cover_image, read_toc))
}

/// 按给定选项提取EPUB的元数据
pub fn get_metadata_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<MetadataRecord> {
    let path = path.as_ref();
    let mut epub = Epub::open(path)?;
    let package = epub.package_document()?;
    info!("读取 {} 的包文件 {}", path.display(), package.path());

    let author_page = read_fallback_page(&mut epub, &options.author_page);
    let date_page = read_fallback_page(&mut epub, &options.date_page);
    let file_size_bytes = fs::metadata(path)?.len();

    let document = package.document();
    let mut record = MetadataRecord {
        format_version: discover_format_version(document),
        title: discover_title(document),
        language: discover_language(document),
        authors: discover_authors(document, author_page.as_ref()),
        publisher: discover_publisher(document),
        publication_date: discover_publication_date(document, date_page.as_ref()),
        identifiers: discover_identifiers(document),
        subject: discover_subject(document),
        file_size_bytes,
        ..MetadataRecord::default()
    };

    if options.read_cover_image {
        if let Some(cover) = discover_cover_image(&mut epub, &package)? {
            debug!("封面图片: {} 字符 (base64), 扩展名 {}", cover.content.len(), cover.extension);
            record.cover_image_bytes = Some(cover.content);
            record.cover_image_extension = Some(cover.extension);
        }
    }

    if options.read_toc {
        record.toc = discover_toc(&mut epub, &package)?;
    }

    Ok(record)
}

/// 获取包文件（OPF）的原始字节
pub fn get_package_document_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut epub = Epub::open(path)?;
    epub.package_document_bytes()
}

/// 读取并解析辅助页面
///
/// 页面可选：不存在、无法读取或没有内容时返回 `None`，不影响提取。
fn read_fallback_page(epub: &mut Epub, name: &str) -> Option<Document> {
    if name.is_empty() {
        return None;
    }
    let content = match epub.read_optional(name) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("辅助页面 {} 不存在", name);
            return None;
        }
        Err(e) => {
            warn!("无法读取辅助页面 {}: {}", name, e);
            return None;
        }
    };
    let page = Document::parse_markup(&content);
    if page.root_element().is_none() {
        warn!("辅助页面 {} 没有可解析的内容", name);
        return None;
    }
    Some(page)
}
