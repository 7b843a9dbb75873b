//! 渲染流水线
//!
//! 解析 → 属性 → 修饰类 → 文本 → 事件，顺序固定。任一阶段失败即中止，
//! 此时节点仍是游离的，不会泄漏到文档中。

use super::component::{ComponentSpec, EventBinding};
use crate::dom::Node;
use crate::error::{RenderError, RenderResult};
use crate::parser::selector::Selector;
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

/// 选择器解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 没有后代匹配
    Root,
    /// 文档顺序中第一个匹配的后代
    Descendant(Node),
}

impl Target {
    /// 取出目标节点，`Root` 解析为传入的根
    pub fn node(self, root: &Node) -> Node {
        match self {
            Target::Root => root.clone(),
            Target::Descendant(node) => node,
        }
    }
}

/// 在根的后代中解析选择器
pub fn resolve_target(root: &Node, selector: &str) -> RenderResult<Target> {
    let selector = parse_selector(selector)?;
    Ok(resolve(root, &selector))
}

fn resolve(root: &Node, selector: &Selector) -> Target {
    match root.select_first(selector) {
        Some(node) => Target::Descendant(node),
        None => Target::Root,
    }
}

fn parse_selector(source: &str) -> RenderResult<Selector> {
    Selector::parse(source).map_err(|e| RenderError::invalid_selector(source, e))
}

/// 组件渲染器
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    /// 每次调用都构建一棵全新的游离子树
    pub fn render(spec: &ComponentSpec) -> RenderResult<Node> {
        let root = Self::parse_template(&spec.template)?;
        Self::apply_attributes(&root, &spec.attributes)?;
        Self::apply_modifiers(&root, &spec.modifiers)?;
        Self::apply_text(&root, &spec.text)?;
        Self::bind_events(&root, &spec.events)?;

        debug!(
            tag = %root.tag_name(),
            attributes = spec.attributes.len(),
            modifiers = spec.modifiers.len(),
            text = spec.text.len(),
            events = spec.events.len(),
            "Rendered component"
        );
        Ok(root)
    }

    fn parse_template(template: &str) -> RenderResult<Node> {
        let container = Node::new_element("div");
        container
            .set_inner_html(template)
            .map_err(|e| RenderError::parse(e.to_string()))?;

        let root = container
            .first_element_child()
            .ok_or_else(|| RenderError::parse("template yields no top-level element"))?;

        let extra = container.child_elements().len() - 1;
        if extra > 0 {
            debug!(extra, "Ignoring extra top-level elements in template");
        }

        root.detach();
        Ok(root)
    }

    fn apply_attributes(root: &Node, attributes: &IndexMap<String, String>) -> RenderResult<()> {
        for (name, value) in attributes {
            trace!(%name, %value, "Setting attribute");
            root.set_attribute(name, value).map_err(|e| {
                warn!(%name, error = %e, "Attribute rejected");
                RenderError::attribute(name, e)
            })?;
        }
        Ok(())
    }

    fn apply_modifiers(root: &Node, modifiers: &[String]) -> RenderResult<()> {
        let classes = root.class_list();
        for class in modifiers {
            classes.add(class).map_err(|e| {
                warn!(%class, error = %e, "Modifier rejected");
                RenderError::modifier(class, e)
            })?;
        }
        Ok(())
    }

    /// 文本不回退到根。没有后代匹配时，
    /// 只有选择器本身匹配根才写到根上
    fn apply_text(root: &Node, text: &IndexMap<String, String>) -> RenderResult<()> {
        for (source, value) in text {
            let selector = parse_selector(source)?;
            let node = match resolve(root, &selector) {
                Target::Descendant(node) => node,
                Target::Root if selector.matches(root, Some(root)) => root.clone(),
                Target::Root => {
                    warn!(selector = %source, "Text selector matched nothing");
                    return Err(RenderError::selector(source));
                }
            };
            trace!(selector = %source, "Replacing text content");
            node.set_text_content(value);
        }
        Ok(())
    }

    /// 事件在没有后代匹配时绑定到根
    fn bind_events(root: &Node, events: &[EventBinding]) -> RenderResult<()> {
        for binding in events {
            let selector = parse_selector(&binding.selector)?;
            let target = resolve(root, &selector);
            trace!(
                selector = %binding.selector,
                event_type = %binding.event_type,
                on_root = matches!(target, Target::Root),
                "Binding listener"
            );

            target
                .node(root)
                .add_event_listener(&binding.event_type, binding.handler.clone())
                .map_err(|e| RenderError::listener(&binding.event_type, e))?;
        }
        Ok(())
    }
}

/// 渲染一个组件，见 [`Renderer::render`]
pub fn render(spec: &ComponentSpec) -> RenderResult<Node> {
    Renderer::render(spec)
}
