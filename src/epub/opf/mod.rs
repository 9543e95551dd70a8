//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块从EPUB的OPF包文件中提取元数据字段、封面图片，以及目录文件在清单中的位置。

mod manifest;
mod metadata;
mod package;

pub use manifest::{
    CoverImage,
    discover_cover_image,
    find_nav_item,
    find_ncx_item,
    locate_cover_image,
};
pub use metadata::{
    discover_authors,
    discover_dc,
    discover_dc_all,
    discover_identifiers,
    discover_language,
    discover_publication_date,
    discover_publisher,
    discover_subject,
    discover_title,
};
pub use package::{PackageDocument, discover_format_version, join_archive_path};
