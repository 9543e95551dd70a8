pub mod epub;

// === 核心API重新导出 ===

/// 元数据提取（主要接口）
pub use epub::{get_metadata, get_metadata_with_options, get_package_document_bytes};

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 提取结果
pub use epub::{MetadataRecord, TocEntry, CoverImage};

/// 提取选项
pub use epub::ExtractOptions;

// === 底层组件（高级用法） ===

/// EPUB压缩包读取器
pub use epub::Epub;

/// 容器组件
pub use epub::{Container, RootFile};

/// 包文件与文档树
pub use epub::{
    PackageDocument,
    Document,
    ElementRef,
    NodeRef,
    find_tag,
    find_image_tag,
    iterate_all_tags,
};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "从EPUB文件中提取书目元数据、封面和目录";

// === 便捷函数 ===

/// 快速打开EPUB文件
///
/// 这是 `Epub::open` 的便捷包装函数。
///
/// # 示例
///
/// ```no_run
/// let mut epub = epub_meta::open("book.epub")?;
/// let opf = epub.package_document()?;
/// println!("包文件: {}", opf.path());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Epub> {
    Epub::open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        println!("epub-meta version: {}", VERSION);
    }

    #[test]
    fn test_description() {
        assert!(!DESCRIPTION.is_empty());
        println!("Description: {}", DESCRIPTION);
    }
}
