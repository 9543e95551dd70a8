//! XML文档树与查询工具
//!
//! 将XML（或容错解析的HTML）读入一棵只读的文档树，并提供按标签名、属性查找元素
//! 以及按文档顺序遍历所有元素的辅助函数。
//!
//! 标签名保留命名空间前缀（如 `dc:title`），与DOM的 `getElementsByTagName` 行为一致。
//! 空白文本节点同样保留，因此"第一个子节点"的语义与标准DOM相同。

use crate::epub::error::Result;
use log::warn;
use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use scraper::Html;
use std::path::Path;

/// 封面等图片允许的扩展名（包含点号，区分大小写）
pub const IMAGE_EXTENSIONS: [&str; 5] = [".gif", ".jpg", ".jpeg", ".png", ".svg"];

type NodeId = usize;

/// 文档节点（根节点）在arena中的位置
const DOCUMENT_NODE: NodeId = 0;

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// 解析后的只读文档树
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// 追加文本节点，相邻的文本会合并为一个节点
    fn append_text(&mut self, parent: NodeId, text: String) {
        if text.is_empty() {
            return;
        }
        if parent == DOCUMENT_NODE && text.trim().is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last].data {
                existing.push_str(&text);
                return;
            }
        }
        self.append(parent, NodeData::Text(text));
    }

    /// 严格解析XML内容
    ///
    /// # 参数
    /// * `content` - XML文件的原始字节
    ///
    /// # 返回值
    /// * `Result<Document, EpubError>` - 标签不配对等格式错误时返回 `XmlError`
    pub fn parse_xml(content: &[u8]) -> Result<Document> {
        let text = decode(content);
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(false);

        let mut document = Document::new();
        let mut stack = vec![DOCUMENT_NODE];
        let mut buf = Vec::new();

        loop {
            let parent = stack.last().copied().unwrap_or(DOCUMENT_NODE);
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let id = document.append(parent, element_data(e));
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    document.append(parent, element_data(e));
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(e) => {
                    // XHTML常用HTML命名实体（如&nbsp;），无法识别的实体保留原文
                    let value = match e.unescape_with(resolve_entity) {
                        Ok(value) => value.into_owned(),
                        Err(_) => String::from_utf8_lossy(&e).into_owned(),
                    };
                    document.append_text(parent, value);
                }
                Event::CData(e) => {
                    document.append_text(parent, String::from_utf8_lossy(&e).into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(document)
    }

    /// 容错解析HTML内容
    ///
    /// 使用html5ever（通过scraper）解析，不会失败；元素名为小写的本地名称。
    pub fn parse_html(content: &[u8]) -> Document {
        let text = decode(content);
        let html = Html::parse_document(&text);

        let mut document = Document::new();
        document.import_html(html.root_element());
        document
    }

    /// 先按XML解析，失败时退回HTML解析
    ///
    /// 用于导航文档和辅助页面这类XHTML文件，真实书籍中它们并不总是格式良好的XML。
    pub fn parse_markup(content: &[u8]) -> Document {
        match Self::parse_xml(content) {
            Ok(document) => document,
            Err(e) => {
                warn!("XHTML不是格式良好的XML（{}），改用HTML解析", e);
                Self::parse_html(content)
            }
        }
    }

    /// 按文档顺序导入html5ever的节点树，使用显式栈
    fn import_html(&mut self, root: scraper::ElementRef<'_>) {
        let mut stack = vec![(*root, DOCUMENT_NODE)];

        while let Some((node, parent)) = stack.pop() {
            if let Some(element) = node.value().as_element() {
                let attributes = element
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                let id = self.append(
                    parent,
                    NodeData::Element {
                        name: element.name().to_string(),
                        attributes,
                    },
                );
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(|child| (child, id)));
            } else if let Some(text) = node.value().as_text() {
                let value: &str = text;
                self.append_text(parent, value.to_string());
            }
        }
    }

    /// 获取根元素
    pub fn root_element(&self) -> Option<ElementRef<'_>> {
        self.nodes[DOCUMENT_NODE]
            .children
            .iter()
            .find_map(|&id| self.element(id))
    }

    /// 按文档顺序遍历所有元素
    pub fn iter_all_tags(&self) -> Descendants<'_> {
        Descendants::new(self, DOCUMENT_NODE)
    }

    /// 按文档顺序查找所有指定标签名的元素（包括所有后代，不仅是直接子元素）
    pub fn elements_by_tag_name<'a>(
        &'a self,
        tag_name: &str,
    ) -> impl Iterator<Item = ElementRef<'a>> {
        self.iter_all_tags().filter(move |element| element.name() == tag_name)
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match self.nodes[id].data {
            NodeData::Element { .. } => Some(ElementRef { document: self, id }),
            _ => None,
        }
    }

    fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        match &self.nodes[id].data {
            NodeData::Element { .. } => Some(NodeRef::Element(ElementRef { document: self, id })),
            NodeData::Text(text) => Some(NodeRef::Text(text)),
            NodeData::Document => None,
        }
    }
}

/// 元素或文本节点的引用
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

impl<'a> NodeRef<'a> {
    /// 如果是文本节点，返回其内容
    pub fn as_text(self) -> Option<&'a str> {
        match self {
            NodeRef::Text(text) => Some(text),
            NodeRef::Element(_) => None,
        }
    }

    /// 如果是元素节点，返回元素引用
    pub fn as_element(self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(element) => Some(element),
            NodeRef::Text(_) => None,
        }
    }
}

/// 指向文档中某个元素的非拥有引用
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    fn node(self) -> &'a Node {
        &self.document.nodes[self.id]
    }

    /// 完整标签名（包含命名空间前缀）
    pub fn name(self) -> &'a str {
        match &self.node().data {
            NodeData::Element { name, .. } => name,
            _ => "",
        }
    }

    /// 去掉命名空间前缀的本地名称
    pub fn local_name(self) -> &'a str {
        let name = self.name();
        name.rsplit(':').next().unwrap_or(name)
    }

    /// 获取属性值
    pub fn attr(self, name: &str) -> Option<&'a str> {
        match &self.node().data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// 父元素（文档节点不算元素）
    pub fn parent(self) -> Option<ElementRef<'a>> {
        self.node().parent.and_then(|id| self.document.element(id))
    }

    /// 子节点序列（元素与文本）
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        let document = self.document;
        self.node()
            .children
            .iter()
            .filter_map(move |&id| document.node_ref(id))
    }

    /// 子元素序列
    pub fn child_elements(self) -> impl Iterator<Item = ElementRef<'a>> {
        self.children().filter_map(|child| child.as_element())
    }

    /// 第一个子节点
    pub fn first_child(self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    /// 第一个子节点是文本时返回其内容（未去除空白）
    pub fn first_text(self) -> Option<&'a str> {
        self.first_child().and_then(|child| child.as_text())
    }

    /// 所有后代文本拼接后的内容
    pub fn text_content(self) -> String {
        let nodes = &self.document.nodes;
        let mut result = String::new();
        let mut stack: Vec<NodeId> = self.node().children.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            match &nodes[id].data {
                NodeData::Text(text) => result.push_str(text),
                NodeData::Element { .. } => stack.extend(nodes[id].children.iter().rev()),
                NodeData::Document => {}
            }
        }
        result
    }

    /// 按文档顺序遍历所有后代元素（不含自身）
    pub fn descendants(self) -> Descendants<'a> {
        Descendants::new(self.document, self.id)
    }
}

/// 前序深度优先的后代元素迭代器
///
/// 使用显式栈，嵌套再深也不会耗尽调用栈。
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    fn new(document: &'a Document, root: NodeId) -> Self {
        let stack = document.nodes[root].children.iter().rev().copied().collect();
        Self { document, stack }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = &self.document.nodes[id];
            if let NodeData::Element { .. } = node.data {
                self.stack.extend(node.children.iter().rev());
                return Some(ElementRef {
                    document: self.document,
                    id,
                });
            }
        }
        None
    }
}

/// 按文档顺序遍历某个元素下的所有元素
pub fn iterate_all_tags(root: ElementRef<'_>) -> Descendants<'_> {
    root.descendants()
}

/// 查找第一个标签名匹配且属性 `attr` 等于 `value` 的元素
pub fn find_tag<'a>(
    document: &'a Document,
    tag_name: &str,
    attr: &str,
    value: &str,
) -> Option<ElementRef<'a>> {
    document
        .elements_by_tag_name(tag_name)
        .find(|element| element.attr(attr) == Some(value))
}

/// 查找匹配的图片元素，返回其 `href` 与扩展名（如 `.jpg`）
///
/// `href` 不是图片的匹配元素会被跳过，继续向后查找。
pub fn find_image_tag(
    document: &Document,
    tag_name: &str,
    attr: &str,
    value: &str,
) -> Option<(String, String)> {
    document
        .elements_by_tag_name(tag_name)
        .filter(|element| element.attr(attr) == Some(value))
        .find_map(|element| {
            let href = element.attr("href")?;
            let extension = file_extension(href)?;
            IMAGE_EXTENSIONS
                .contains(&extension.as_str())
                .then(|| (href.to_string(), extension))
        })
}

/// 文件扩展名（包含点号）；以点开头的文件名视为没有扩展名
fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
}

fn element_data(e: &BytesStart) -> NodeData {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    let mut attrs = e.attributes();
    for attr in attrs.with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value_with(resolve_entity) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push((key, value));
    }
    NodeData::Element { name, attributes }
}

/// XML预定义实体与HTML5命名实体
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or_else(|| resolve_html5_entity(entity))
}

/// 按UTF-8解码并去掉BOM
fn decode(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    text.trim_start_matches('\u{feff}').to_string()
}
