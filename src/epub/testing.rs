//! 测试用EPUB构建工具

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 指向 `OEBPS/content.opf` 的标准container.xml
pub const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

/// 临时目录中的测试EPUB，离开作用域时删除
pub struct TestEpub {
    _dir: TempDir,
    path: PathBuf,
}

impl TestEpub {
    pub fn builder() -> TestEpubBuilder {
        TestEpubBuilder {
            mimetype: true,
            files: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 就地替换压缩包中的字节，用于制造校验和错误的条目
    pub fn overwrite_bytes(&self, from: &[u8], to: &[u8]) {
        assert_eq!(from.len(), to.len());
        let mut bytes = std::fs::read(&self.path).unwrap();
        let start = bytes
            .windows(from.len())
            .position(|window| window == from)
            .unwrap();
        bytes[start..start + to.len()].copy_from_slice(to);
        std::fs::write(&self.path, bytes).unwrap();
    }
}

pub struct TestEpubBuilder {
    mimetype: bool,
    files: Vec<(String, Vec<u8>, CompressionMethod)>,
}

impl TestEpubBuilder {
    pub fn without_mimetype(mut self) -> Self {
        self.mimetype = false;
        self
    }

    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((
            name.to_string(),
            content.as_ref().to_vec(),
            CompressionMethod::Deflated,
        ));
        self
    }

    /// 不压缩地写入文件，内容在压缩包中保持原样
    pub fn stored_file(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((
            name.to_string(),
            content.as_ref().to_vec(),
            CompressionMethod::Stored,
        ));
        self
    }

    pub fn build(self) -> TestEpub {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());

        if self.mimetype {
            let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file("mimetype", stored).unwrap();
            zip.write_all(b"application/epub+zip").unwrap();
        }
        for (name, content, method) in &self.files {
            let options = SimpleFileOptions::default().compression_method(*method);
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();

        TestEpub { _dir: dir, path }
    }
}

/// 生成包文件，`metadata` 与 `manifest` 为对应元素的内部内容
pub fn package_xml(version: &str, metadata: &str, manifest: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="{version}" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
{metadata}
  </metadata>
  <manifest>
{manifest}
  </manifest>
  <spine></spine>
</package>"#
    )
}
