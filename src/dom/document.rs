//! 宿主文档
//!
//! 渲染器本身不依赖文档；调用方用它定位容器并挂载渲染结果。

use super::node::{validate_name, Node};
use crate::error::DomResult;

#[derive(Debug, Clone)]
pub struct Document {
    body: Node,
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Node::new_element("body"),
        }
    }

    /// 以给定标记作为 body 内容创建文档
    pub fn from_html(markup: &str) -> DomResult<Self> {
        let document = Self::new();
        document.body.set_inner_html(markup)?;
        Ok(document)
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        self.body
            .descendants()
            .into_iter()
            .find(|n| n.is_element() && n.id().as_deref() == Some(id))
    }

    pub fn query_selector(&self, selector: &str) -> DomResult<Option<Node>> {
        self.body.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<Node>> {
        self.body.query_selector_all(selector)
    }

    /// 创建一个游离的元素
    pub fn create_element(&self, tag_name: &str) -> DomResult<Node> {
        validate_name(tag_name)?;
        Ok(Node::new_element(tag_name))
    }

    pub fn create_text_node(&self, content: &str) -> Node {
        Node::new_text(content)
    }

    /// body 的内部标记
    pub fn to_html(&self) -> String {
        self.body.inner_html()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
