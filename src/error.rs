//! 错误类型

use std::path::PathBuf;

/// 宿主节点树（DOM 层）拒绝某个操作时返回的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("invalid character in name {name:?}")]
    InvalidCharacter { name: String },

    #[error("class token must not be empty")]
    EmptyToken,

    #[error("invalid event type {event_type:?}")]
    InvalidEventType { event_type: String },

    #[error("hierarchy request error: {message}")]
    HierarchyRequest { message: String },

    #[error("selector syntax error in {selector:?}: {message}")]
    Syntax { selector: String, message: String },

    #[error("markup parse error: {message}")]
    Markup { message: String },
}

impl DomError {
    pub fn invalid_character(name: impl Into<String>) -> Self {
        Self::InvalidCharacter { name: name.into() }
    }

    pub fn invalid_event_type(event_type: impl Into<String>) -> Self {
        Self::InvalidEventType {
            event_type: event_type.into(),
        }
    }

    pub fn hierarchy_request(msg: impl Into<String>) -> Self {
        Self::HierarchyRequest {
            message: msg.into(),
        }
    }

    pub fn syntax(selector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Syntax {
            selector: selector.into(),
            message: msg.into(),
        }
    }

    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup {
            message: msg.into(),
        }
    }
}

/// DOM 层操作的结果类型
pub type DomResult<T> = Result<T, DomError>;

/// 渲染失败。任何一个阶段失败都会中止整个渲染，不返回半成品节点。
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template parse error: {message}")]
    Parse { message: String },

    #[error("selector {selector:?} matched no descendant")]
    Selector { selector: String },

    #[error("attribute {name:?} rejected: {source}")]
    Attribute {
        name: String,
        #[source]
        source: DomError,
    },

    #[error("modifier {class:?} rejected: {source}")]
    Modifier {
        class: String,
        #[source]
        source: DomError,
    },

    #[error("invalid selector {selector:?}: {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: DomError,
    },

    #[error("cannot bind {event_type:?} listener: {source}")]
    Listener {
        event_type: String,
        #[source]
        source: DomError,
    },
}

/// 渲染结果类型
pub type RenderResult<T> = Result<T, RenderError>;

impl RenderError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
        }
    }

    pub fn attribute(name: impl Into<String>, source: DomError) -> Self {
        Self::Attribute {
            name: name.into(),
            source,
        }
    }

    pub fn modifier(class: impl Into<String>, source: DomError) -> Self {
        Self::Modifier {
            class: class.into(),
            source,
        }
    }

    pub fn invalid_selector(selector: impl Into<String>, source: DomError) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            source,
        }
    }

    pub fn listener(event_type: impl Into<String>, source: DomError) -> Self {
        Self::Listener {
            event_type: event_type.into(),
            source,
        }
    }
}

/// 组件清单加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("no handler registered under {name:?}")]
    UnknownHandler { name: String },

    #[error("no component named {name:?} in manifest")]
    UnknownComponent { name: String },
}

impl ConfigError {
    pub fn unknown_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler { name: name.into() }
    }

    pub fn unknown_component(name: impl Into<String>) -> Self {
        Self::UnknownComponent { name: name.into() }
    }
}
