//! 组件渲染器

pub mod component;
pub mod pipeline;

pub use component::{ComponentSpec, EventBinding};
pub use pipeline::{render, resolve_target, Renderer, Target};
