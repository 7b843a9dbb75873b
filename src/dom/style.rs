//! 内联样式视图

use super::node::Node;

/// 以 `style` 属性为存储的声明列表
#[derive(Debug, Clone)]
pub struct StyleDeclaration {
    node: Node,
}

impl StyleDeclaration {
    pub(crate) fn new(node: Node) -> Self {
        Self { node }
    }

    /// 解析 `a: b; c: d` 形式的声明
    fn declarations(&self) -> Vec<(String, String)> {
        let Some(style) = self.node.get_attribute("style") else {
            return Vec::new();
        };

        style
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    None
                } else {
                    Some((name, value.to_string()))
                }
            })
            .collect()
    }

    fn write(&self, declarations: &[(String, String)]) {
        if declarations.is_empty() {
            self.node.remove_attribute("style");
            return;
        }
        let css = declarations
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        self.node.write_attribute("style", &css);
    }

    /// 读取属性值，支持 `text-decoration` 与 `textDecoration` 两种写法
    pub fn get_property(&self, name: &str) -> Option<String> {
        let name = css_property_name(name);
        self.declarations()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// 设置属性，值为空时移除
    pub fn set_property(&self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(name);
            return;
        }

        let name = css_property_name(name);
        let mut declarations = self.declarations();
        match declarations.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((name, value.to_string())),
        }
        self.write(&declarations);
    }

    pub fn remove_property(&self, name: &str) -> Option<String> {
        let name = css_property_name(name);
        let mut declarations = self.declarations();
        let index = declarations.iter().position(|(n, _)| *n == name)?;
        let (_, old) = declarations.remove(index);
        self.write(&declarations);
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.declarations().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// camelCase 转 kebab-case
fn css_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.trim().chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
