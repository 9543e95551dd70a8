use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::epub::container::{CONTAINER_PATH, Container};
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::PackageDocument;

const EXPECTED_MIMETYPE: &str = "application/epub+zip";

/// 表示一个已打开的EPUB文件
///
/// 句柄只读，仅在一次提取调用中使用，离开作用域时自动关闭。
pub struct Epub {
    archive: ZipArchive<File>,
}

impl Epub {
    /// 检查路径是否为可读取的zip压缩包
    pub fn is_valid_archive<P: AsRef<Path>>(path: P) -> bool {
        File::open(path)
            .ok()
            .and_then(|file| ZipArchive::new(file).ok())
            .is_some()
    }

    /// 从文件路径打开EPUB
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<Epub, EpubError>` - 文件不存在或不是zip压缩包时返回 `InvalidArchive`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Epub> {
        let path = path.as_ref();
        let invalid = || EpubError::InvalidArchive {
            path: path.display().to_string(),
        };

        let file = File::open(path).map_err(|e| {
            debug!("无法打开 {}: {}", path.display(), e);
            invalid()
        })?;
        let archive = ZipArchive::new(file).map_err(|e| {
            debug!("{} 不是zip压缩包: {}", path.display(), e);
            invalid()
        })?;

        let mut epub = Epub { archive };
        epub.check_mimetype();
        Ok(epub)
    }

    /// 检查mimetype文件；缺失或内容不符只记录警告，不影响元数据提取
    fn check_mimetype(&mut self) {
        match self.read_optional("mimetype") {
            Ok(Some(content)) => {
                let found = String::from_utf8_lossy(&content);
                if found.trim() != EXPECTED_MIMETYPE {
                    warn!(
                        "mimetype不符: 期望 {}, 找到 {}",
                        EXPECTED_MIMETYPE,
                        found.trim()
                    );
                }
            }
            Ok(None) => warn!("EPUB中缺少mimetype文件"),
            Err(e) => warn!("无法读取mimetype文件: {}", e),
        }
    }

    /// 读取压缩包内指定文件的二进制内容
    ///
    /// # 参数
    /// * `name` - 压缩包内的路径
    ///
    /// # 返回值
    /// * `Result<Vec<u8>, EpubError>` - 文件不存在时返回 `MissingEntry`
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_optional(name)?
            .ok_or_else(|| EpubError::MissingEntry(name.to_string()))
    }

    /// 读取可选文件，文件不存在时返回 `Ok(None)`
    pub fn read_optional(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(Some(buffer))
    }

    /// 解析container.xml文件
    pub fn parse_container(&mut self) -> Result<Container> {
        let content = self.read(CONTAINER_PATH)?;
        Container::parse_xml(&content)
    }

    /// 获取包文件（OPF）在压缩包中的路径
    pub fn package_document_path(&mut self) -> Result<String> {
        let container = self.parse_container()?;
        container
            .package_document_path()
            .map(str::to_string)
            .ok_or_else(|| {
                EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
            })
    }

    /// 读取包文件的原始字节
    pub fn package_document_bytes(&mut self) -> Result<Vec<u8>> {
        let path = self.package_document_path()?;
        self.read(&path)
    }

    /// 读取并解析包文件
    pub fn package_document(&mut self) -> Result<PackageDocument> {
        let path = self.package_document_path()?;
        let content = self.read(&path)?;
        debug!("解析包文件: {}", path);
        PackageDocument::parse(path, &content)
    }
}
