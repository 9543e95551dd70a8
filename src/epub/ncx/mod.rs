//! 目录（Table of Contents）模块
//!
//! 此模块从EPUB 3导航文档或EPUB 2 NCX导航控制文件中提取目录，
//! 并将嵌套结构展平为带层级和编号的目录项列表。

pub mod navigation;
pub mod parser;
pub mod toc;

pub use navigation::{MAX_ANCESTOR_STEPS, parse_nav_document};
pub use parser::parse_ncx_document;
pub use toc::{TocEntry, discover_toc, finalize};
