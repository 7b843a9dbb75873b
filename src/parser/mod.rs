//! HTML 片段与 CSS 选择器解析器

pub mod html;
pub mod selector;

pub use html::HtmlParser;
pub use selector::Selector;
