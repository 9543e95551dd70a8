//! 包文件（OPF）模块
//!
//! 保存解析后的OPF文档树及其在压缩包中的位置，负责把清单中的相对路径解析为压缩包路径。

use crate::epub::error::Result;
use crate::epub::xml::Document;

/// 解析后的包文件
#[derive(Debug, Clone)]
pub struct PackageDocument {
    /// OPF文件在压缩包中的路径
    path: String,
    /// OPF文档树
    document: Document,
}

impl PackageDocument {
    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `path` - OPF文件在压缩包中的路径（来自container.xml）
    /// * `content` - OPF文件的原始字节
    pub fn parse(path: impl Into<String>, content: &[u8]) -> Result<PackageDocument> {
        Ok(PackageDocument {
            path: path.into(),
            document: Document::parse_xml(content)?,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// OPF文件所在目录，位于压缩包根目录时为空字符串
    pub fn base_dir(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    /// 将清单中相对于OPF文件的href解析为压缩包内路径
    pub fn resolve(&self, href: &str) -> String {
        join_archive_path(self.base_dir(), href)
    }
}

/// 拼接压缩包内路径，并规范化 `.` 与 `..` 片段
///
/// 以 `/` 开头的href视为相对于压缩包根目录。
pub fn join_archive_path(base_dir: &str, href: &str) -> String {
    let mut segments: Vec<&str> = if href.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// 读取根package元素的version属性
pub fn discover_format_version(document: &Document) -> Option<String> {
    ["package", "opf:package"]
        .iter()
        .find_map(|name| document.elements_by_tag_name(name).next())
        .and_then(|package| package.attr("version"))
        .map(|version| version.trim().to_string())
        .filter(|version| !version.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_and_resolve() {
        let package = PackageDocument::parse("OEBPS/content.opf", b"<package/>").unwrap();
        assert_eq!(package.path(), "OEBPS/content.opf");
        assert_eq!(package.base_dir(), "OEBPS");
        assert_eq!(package.resolve("images/c.jpg"), "OEBPS/images/c.jpg");

        let root = PackageDocument::parse("content.opf", b"<package/>").unwrap();
        assert_eq!(root.base_dir(), "");
        assert_eq!(root.resolve("images/c.jpg"), "images/c.jpg");
    }

    #[test]
    fn test_join_archive_path_normalizes_segments() {
        assert_eq!(join_archive_path("OEBPS/text", "../images/c.jpg"), "OEBPS/images/c.jpg");
        assert_eq!(join_archive_path("OEBPS", "./nav.xhtml"), "OEBPS/nav.xhtml");
        assert_eq!(join_archive_path("OEBPS", "/cover.png"), "cover.png");
        assert_eq!(join_archive_path("", "toc.ncx"), "toc.ncx");
    }

    #[test]
    fn test_discover_format_version() {
        let package = PackageDocument::parse(
            "content.opf",
            br#"<package version="2.0" xmlns="http://www.idpf.org/2007/opf"><metadata/></package>"#,
        )
        .unwrap();
        assert_eq!(discover_format_version(package.document()), Some("2.0".to_string()));

        let prefixed = Document::parse_xml(br#"<opf:package version="3.0"/>"#).unwrap();
        assert_eq!(discover_format_version(&prefixed), Some("3.0".to_string()));

        let missing = Document::parse_xml(br#"<package><metadata/></package>"#).unwrap();
        assert_eq!(discover_format_version(&missing), None);
    }

    #[test]
    fn test_malformed_package_document() {
        let result = PackageDocument::parse("content.opf", b"<package><metadata></package>");
        assert!(result.is_err());
    }
}
