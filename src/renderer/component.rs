//! 组件描述

use crate::dom::Node;
use crate::event::{Event, EventHandler};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// 一条事件绑定
#[derive(Clone)]
pub struct EventBinding {
    pub selector: String,
    pub event_type: String,
    pub handler: EventHandler,
}

impl EventBinding {
    pub fn new(selector: &str, event_type: &str, handler: EventHandler) -> Self {
        Self {
            selector: selector.to_string(),
            event_type: event_type.to_string(),
            handler,
        }
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("selector", &self.selector)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// 组件的声明式描述：模板骨架加四层叠加（属性、修饰类、文本、事件）。
///
/// 属性与修饰类只作用于根节点；文本与事件按选择器定位。
/// 渲染器只读取它，不做修改。
#[derive(Debug, Clone, Default)]
pub struct ComponentSpec {
    pub template: String,
    pub attributes: IndexMap<String, String>,
    pub modifiers: Vec<String>,
    pub text: IndexMap<String, String>,
    pub events: Vec<EventBinding>,
}

impl ComponentSpec {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            ..Default::default()
        }
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn modifier(mut self, class: &str) -> Self {
        self.modifiers.push(class.to_string());
        self
    }

    pub fn text(mut self, selector: &str, value: &str) -> Self {
        self.text.insert(selector.to_string(), value.to_string());
        self
    }

    pub fn on<F>(self, selector: &str, event_type: &str, f: F) -> Self
    where
        F: Fn(&Node, &mut Event) + 'static,
    {
        self.on_handler(selector, event_type, Rc::new(f))
    }

    pub fn on_handler(mut self, selector: &str, event_type: &str, handler: EventHandler) -> Self {
        self.events.push(EventBinding::new(selector, event_type, handler));
        self
    }
}
