//! 事件系统 - 监听器注册与分发

use crate::dom::Node;
use std::fmt;
use std::rc::Rc;

/// 事件处理函数
///
/// 第一个参数是注册了该监听器的节点（宿主约定中的 `this`），
/// 第二个参数是正在分发的事件。
pub type EventHandler = Rc<dyn Fn(&Node, &mut Event)>;

/// 把闭包包装成 [`EventHandler`]
pub fn handler<F>(f: F) -> EventHandler
where
    F: Fn(&Node, &mut Event) + 'static,
{
    Rc::new(f)
}

/// 分发中的事件
pub struct Event {
    pub(crate) event_type: String,
    pub(crate) bubbles: bool,
    pub(crate) target: Option<Node>,
    pub(crate) current_target: Option<Node>,
    pub(crate) propagation_stopped: bool,
    pub(crate) default_prevented: bool,
}

impl Event {
    /// 不冒泡的事件
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: false,
            target: None,
            current_target: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// 沿祖先链冒泡的事件
    pub fn bubbling(event_type: &str) -> Self {
        Self {
            bubbles: true,
            ..Self::new(event_type)
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// 最初接收事件的节点
    pub fn target(&self) -> Option<&Node> {
        self.target.as_ref()
    }

    /// 当前正在执行监听器的节点
    pub fn current_target(&self) -> Option<&Node> {
        self.current_target.as_ref()
    }

    /// 当前节点上的其余监听器仍会执行，但不再向上冒泡
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("propagation_stopped", &self.propagation_stopped)
            .field("default_prevented", &self.default_prevented)
            .finish()
    }
}

/// 节点上的一个监听器。只追加，不去重。
#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) event_type: String,
    pub(crate) handler: EventHandler,
}

impl Listener {
    pub(crate) fn new(event_type: &str, handler: EventHandler) -> Self {
        Self {
            event_type: event_type.to_string(),
            handler,
        }
    }
}

/// 检查事件类型是否可注册
pub(crate) fn is_valid_event_type(event_type: &str) -> bool {
    !event_type.is_empty() && !event_type.chars().any(char::is_whitespace)
}
