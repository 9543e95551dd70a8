pub mod error;
pub mod xml;
pub mod container;
pub mod reader;
pub mod opf;
pub mod ncx;
pub mod fallback;
pub mod config;
pub mod record;
pub mod extractor;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出EPUB读取器
pub use reader::Epub;

// 重新导出文档树
pub use xml::{Document, ElementRef, NodeRef, find_image_tag, find_tag, iterate_all_tags};

// 重新导出OPF相关
pub use opf::{CoverImage, PackageDocument};

// 重新导出目录相关
pub use ncx::TocEntry;

// 重新导出提取流程
pub use config::ExtractOptions;
pub use record::MetadataRecord;
pub use extractor::{get_metadata, get_metadata_with_options, get_package_document_bytes};
