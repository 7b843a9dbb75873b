//! 宿主节点树：解析、属性、类名、文本、查询与事件监听

mod class_list;
mod document;
mod node;
mod serialize;
mod style;

pub use class_list::ClassList;
pub use document::Document;
pub use node::{Node, NodeType};
pub use style::StyleDeclaration;
