//! Mini Component - 声明式组件渲染器
//! 把模板骨架与属性、修饰类、文本、事件四层描述组合成一个可交互的游离元素

// 错误类型
pub mod error;

// 宿主节点树
pub mod dom;

// 事件系统
pub mod event;

// HTML / 选择器解析器
pub mod parser;

// 组件渲染器
pub mod renderer;

// 组件清单
pub mod config;

pub use config::{ComponentManifest, EventManifest, HandlerRegistry, ManifestFile};
pub use dom::{ClassList, Document, Node, NodeType, StyleDeclaration};
pub use error::{ConfigError, DomError, DomResult, RenderError, RenderResult};
pub use event::{handler, Event, EventHandler};
pub use renderer::{render, resolve_target, ComponentSpec, EventBinding, Renderer, Target};

// 单元测试
#[cfg(test)]
mod tests;
