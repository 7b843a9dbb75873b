//! 节点树
//!
//! 单线程的引用计数树。`Node` 是廉价可克隆的句柄，相等性按身份比较；
//! 父节点是弱引用，因此脱离父节点的子树可以独立存活。

use super::class_list::ClassList;
use super::serialize;
use super::style::StyleDeclaration;
use crate::error::{DomError, DomResult};
use crate::event::{is_valid_event_type, Event, EventHandler, Listener};
use crate::parser::html::HtmlParser;
use crate::parser::selector::Selector;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
}

pub(crate) struct NodeData {
    node_type: NodeType,
    tag_name: String,
    attributes: IndexMap<String, String>,
    text_content: String,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    checked: bool,
    // 一旦通过 set_checked 改写过，checked 属性就不再影响选中状态
    checked_dirty: bool,
    listeners: Vec<Listener>,
}

/// 节点句柄
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    fn with_data(node_type: NodeType, tag_name: String, text_content: String) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            node_type,
            tag_name,
            attributes: IndexMap::new(),
            text_content,
            children: Vec::new(),
            parent: Weak::new(),
            checked: false,
            checked_dirty: false,
            listeners: Vec::new(),
        })))
    }

    pub fn new_element(tag_name: &str) -> Self {
        Self::with_data(NodeType::Element, tag_name.to_ascii_lowercase(), String::new())
    }

    pub fn new_text(content: &str) -> Self {
        Self::with_data(NodeType::Text, String::new(), content.to_string())
    }

    pub fn new_comment(content: &str) -> Self {
        Self::with_data(NodeType::Comment, String::new(), content.to_string())
    }

    pub fn node_type(&self) -> NodeType {
        self.0.borrow().node_type
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// 小写标签名；文本和注释节点为空串
    pub fn tag_name(&self) -> String {
        self.0.borrow().tag_name.clone()
    }

    /// 文本或注释节点的内容
    pub fn node_value(&self) -> Option<String> {
        let data = self.0.borrow();
        match data.node_type {
            NodeType::Element => None,
            NodeType::Text | NodeType::Comment => Some(data.text_content.clone()),
        }
    }

    /// 是否为同一个节点
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ---------------------------------------------------------------
    // 树结构
    // ---------------------------------------------------------------

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_elements(&self) -> Vec<Node> {
        self.children().into_iter().filter(Node::is_element).collect()
    }

    pub fn first_element_child(&self) -> Option<Node> {
        self.children().into_iter().find(Node::is_element)
    }

    pub fn next_element_sibling(&self) -> Option<Node> {
        self.sibling_element(true)
    }

    pub fn previous_element_sibling(&self) -> Option<Node> {
        self.sibling_element(false)
    }

    fn sibling_element(&self, forward: bool) -> Option<Node> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|n| n.ptr_eq(self))?;
        if forward {
            siblings[index + 1..].iter().find(|n| n.is_element()).cloned()
        } else {
            siblings[..index].iter().rev().find(|n| n.is_element()).cloned()
        }
    }

    /// 所有后代节点，文档顺序，不含自身
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Node> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// `other` 是否为自身或自身的后代
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// 追加子节点。子节点原来有父节点时会先从原位置移走。
    pub fn append_child(&self, child: &Node) -> DomResult<()> {
        if !self.is_element() {
            return Err(DomError::hierarchy_request("only elements can have children"));
        }
        if child.contains(self) {
            return Err(DomError::hierarchy_request(
                "the new child is an inclusive ancestor of the parent",
            ));
        }

        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    /// 移除直接子节点，返回是否移除
    pub fn remove_child(&self, child: &Node) -> bool {
        match child.parent() {
            Some(parent) if parent.ptr_eq(self) => {
                child.detach();
                true
            }
            _ => false,
        }
    }

    /// 从父节点上摘下
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    // ---------------------------------------------------------------
    // 属性
    // ---------------------------------------------------------------

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0
            .borrow()
            .attributes
            .contains_key(&name.to_ascii_lowercase())
    }

    /// 设置属性，已存在时覆盖并保持原来的位置
    pub fn set_attribute(&self, name: &str, value: &str) -> DomResult<()> {
        validate_name(name)?;
        if !self.is_element() {
            return Err(DomError::hierarchy_request("only elements carry attributes"));
        }
        self.write_attribute(&name.to_ascii_lowercase(), value);
        Ok(())
    }

    /// 写入已校验、已小写的属性名
    pub(crate) fn write_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        data.attributes.insert(name.to_string(), value.to_string());
        if name == "checked" && !data.checked_dirty {
            data.checked = true;
        }
    }

    /// 解析器使用：重复属性以第一次出现的为准
    pub(crate) fn insert_parsed_attribute(&self, name: &str, value: &str) {
        if !self.has_attribute(name) {
            self.write_attribute(&name.to_ascii_lowercase(), value);
        }
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let mut data = self.0.borrow_mut();
        let removed = data.attributes.shift_remove(&name).is_some();
        if removed && name == "checked" && !data.checked_dirty {
            data.checked = false;
        }
        removed
    }

    /// 按插入顺序返回全部属性
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn id(&self) -> Option<String> {
        self.get_attribute("id")
    }

    pub fn class_list(&self) -> ClassList {
        ClassList::new(self.clone())
    }

    pub fn style(&self) -> StyleDeclaration {
        StyleDeclaration::new(self.clone())
    }

    // ---------------------------------------------------------------
    // 文本与标记
    // ---------------------------------------------------------------

    /// 所有后代文本节点内容的拼接
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.0.borrow();
        match data.node_type {
            NodeType::Text | NodeType::Comment => out.push_str(&data.text_content),
            NodeType::Element => {
                for child in &data.children {
                    if child.node_type() != NodeType::Comment {
                        child.collect_text(out);
                    }
                }
            }
        }
    }

    /// 替换全部内容：移除所有子节点，非空时插入一个文本节点
    pub fn set_text_content(&self, value: &str) {
        if !self.is_element() {
            self.0.borrow_mut().text_content = value.to_string();
            return;
        }

        self.clear_children();
        if !value.is_empty() {
            let text = Node::new_text(value);
            text.0.borrow_mut().parent = Rc::downgrade(&self.0);
            self.0.borrow_mut().children.push(text);
        }
    }

    /// 用解析后的标记替换全部子节点
    pub fn set_inner_html(&self, markup: &str) -> DomResult<()> {
        let nodes = HtmlParser::new(markup).parse()?;
        self.clear_children();
        for node in &nodes {
            self.append_child(node)?;
        }
        Ok(())
    }

    pub fn inner_html(&self) -> String {
        serialize::inner_html(self)
    }

    pub fn outer_html(&self) -> String {
        serialize::outer_html(self)
    }

    // ---------------------------------------------------------------
    // 表单状态
    // ---------------------------------------------------------------

    pub fn checked(&self) -> bool {
        self.0.borrow().checked
    }

    pub fn set_checked(&self, checked: bool) {
        let mut data = self.0.borrow_mut();
        data.checked = checked;
        data.checked_dirty = true;
    }

    /// checkbox / radio 类型的 input
    pub fn is_checkable(&self) -> bool {
        if self.tag_name() != "input" {
            return false;
        }
        matches!(
            self.get_attribute("type")
                .map(|t| t.to_ascii_lowercase())
                .as_deref(),
            Some("checkbox") | Some("radio")
        )
    }

    // ---------------------------------------------------------------
    // 选择器查询
    // ---------------------------------------------------------------

    /// 在后代中查找第一个匹配的元素，自身不参与匹配
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<Node>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_first(&selector))
    }

    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<Node>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(&selector))
    }

    /// 自身是否匹配选择器
    pub fn matches(&self, selector: &str) -> DomResult<bool> {
        Ok(Selector::parse(selector)?.matches(self, None))
    }

    pub fn select_first(&self, selector: &Selector) -> Option<Node> {
        self.descendants()
            .into_iter()
            .find(|n| selector.matches(n, Some(self)))
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<Node> {
        self.descendants()
            .into_iter()
            .filter(|n| selector.matches(n, Some(self)))
            .collect()
    }

    // ---------------------------------------------------------------
    // 事件
    // ---------------------------------------------------------------

    /// 注册监听器。同一类型的多个监听器按注册顺序累加。
    pub fn add_event_listener(&self, event_type: &str, handler: EventHandler) -> DomResult<()> {
        if !is_valid_event_type(event_type) {
            return Err(DomError::invalid_event_type(event_type));
        }
        self.0
            .borrow_mut()
            .listeners
            .push(Listener::new(event_type, handler));
        Ok(())
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }

    fn listeners_for(&self, event_type: &str) -> Vec<EventHandler> {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .map(|l| l.handler.clone())
            .collect()
    }

    /// 分发事件：先目标节点，冒泡事件再依次经过祖先。
    /// 返回 false 表示事件被 prevent_default。
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        event.target = Some(self.clone());

        let mut path = vec![self.clone()];
        if event.bubbles {
            let mut current = self.parent();
            while let Some(node) = current {
                current = node.parent();
                path.push(node);
            }
        }

        for node in path {
            let handlers = node.listeners_for(&event.event_type);
            if handlers.is_empty() {
                continue;
            }
            event.current_target = Some(node.clone());
            for handler in handlers {
                handler(&node, &mut *event);
            }
            if event.propagation_stopped {
                break;
            }
        }

        event.current_target = None;
        !event.default_prevented
    }

    /// 模拟一次点击。可勾选的 input 会在分发前切换选中状态，
    /// 事件被取消时恢复。
    pub fn click(&self) -> bool {
        let checkable = self.is_checkable();
        let previous = self.checked();
        if checkable {
            let is_radio = self
                .get_attribute("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("radio"));
            self.set_checked(if is_radio { true } else { !previous });
        }

        let mut event = Event::bubbling("click");
        let not_cancelled = self.dispatch_event(&mut event);
        if checkable && !not_cancelled {
            self.set_checked(previous);
        }
        not_cancelled
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        match data.node_type {
            NodeType::Element => f
                .debug_struct("Element")
                .field("tag_name", &data.tag_name)
                .field("attributes", &data.attributes)
                .field("children", &data.children.len())
                .field("listeners", &data.listeners.len())
                .finish(),
            NodeType::Text => f.debug_tuple("Text").field(&data.text_content).finish(),
            NodeType::Comment => f.debug_tuple("Comment").field(&data.text_content).finish(),
        }
    }
}

/// 属性名 / 标签名校验
pub(crate) fn validate_name(name: &str) -> DomResult<()> {
    let mut chars = name.chars();
    let valid_start = match chars.next() {
        Some(c) => !(c.is_ascii_digit() || c == '-' || c == '.'),
        None => false,
    };
    let valid = valid_start
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\0' | '"' | '\'' | '<' | '>' | '/' | '='));

    if valid {
        Ok(())
    } else {
        Err(DomError::invalid_character(name))
    }
}
