use crate::epub::error::{EpubError, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// container.xml 在压缩包中的固定路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: Option<String>,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `content` - container.xml的原始字节
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息
    pub fn parse_xml(content: &[u8]) -> Result<Container> {
        let mut reader = Reader::from_reader(content);
        reader.config_mut().trim_text(true);

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"rootfile" =>
                {
                    let mut full_path = None;
                    let mut media_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"full-path" => {
                                full_path = Some(String::from_utf8_lossy(&attr.value).to_string());
                            }
                            b"media-type" => {
                                media_type = Some(String::from_utf8_lossy(&attr.value).to_string());
                            }
                            _ => {}
                        }
                    }

                    // 缺少full-path的rootfile无法定位包文件，直接忽略
                    if let Some(full_path) = full_path.filter(|path| !path.is_empty()) {
                        rootfiles.push(RootFile {
                            full_path,
                            media_type,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到带full-path属性的rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取包文件（OPF）路径：第一个rootfile的full-path
    pub fn package_document_path(&self) -> Option<&str> {
        self.rootfiles.first().map(|rf| rf.full_path.as_str())
    }
}
