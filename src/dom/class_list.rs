//! class 属性的集合视图

use super::node::Node;
use crate::error::{DomError, DomResult};

/// 以 `class` 属性为存储的类名集合。
/// 成员按集合语义判断，迭代顺序为首次出现的顺序。
#[derive(Debug, Clone)]
pub struct ClassList {
    node: Node,
}

impl ClassList {
    pub(crate) fn new(node: Node) -> Self {
        Self { node }
    }

    fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        if let Some(value) = self.node.get_attribute("class") {
            for token in value.split_whitespace() {
                if !tokens.iter().any(|t| t == token) {
                    tokens.push(token.to_string());
                }
            }
        }
        tokens
    }

    fn write(&self, tokens: &[String]) {
        self.node.write_attribute("class", &tokens.join(" "));
    }

    fn validate(token: &str) -> DomResult<()> {
        if token.is_empty() {
            return Err(DomError::EmptyToken);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(DomError::invalid_character(token));
        }
        Ok(())
    }

    /// 添加类名，已存在时不变
    pub fn add(&self, token: &str) -> DomResult<()> {
        Self::validate(token)?;
        let mut tokens = self.tokens();
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        self.write(&tokens);
        Ok(())
    }

    pub fn remove(&self, token: &str) -> DomResult<()> {
        Self::validate(token)?;
        if !self.node.has_attribute("class") {
            return Ok(());
        }
        let mut tokens = self.tokens();
        tokens.retain(|t| t != token);
        self.write(&tokens);
        Ok(())
    }

    /// 切换类名，返回切换后是否存在
    pub fn toggle(&self, token: &str) -> DomResult<bool> {
        if self.contains(token) {
            self.remove(token)?;
            Ok(false)
        } else {
            self.add(token)?;
            Ok(true)
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens().iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tokens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let node = Node::new_element("div");
        let classes = node.class_list();
        classes.add("btn").unwrap();
        classes.add("btn-primary").unwrap();
        classes.add("btn").unwrap();
        assert_eq!(classes.to_vec(), vec!["btn", "btn-primary"]);
        assert_eq!(node.get_attribute("class").as_deref(), Some("btn btn-primary"));
    }

    #[test]
    fn test_add_normalizes_existing_duplicates() {
        let node = Node::new_element("div");
        node.set_attribute("class", "a  b a").unwrap();
        node.class_list().add("c").unwrap();
        assert_eq!(node.get_attribute("class").as_deref(), Some("a b c"));
    }

    #[test]
    fn test_invalid_tokens() {
        let classes = Node::new_element("div").class_list();
        assert_eq!(classes.add(""), Err(DomError::EmptyToken));
        assert!(matches!(
            classes.add("two words"),
            Err(DomError::InvalidCharacter { .. })
        ));
        assert!(classes.is_empty());
    }

    #[test]
    fn test_toggle_and_remove() {
        let node = Node::new_element("li");
        let classes = node.class_list();
        assert!(classes.toggle("done").unwrap());
        assert!(classes.contains("done"));
        assert!(!classes.toggle("done").unwrap());
        assert!(!classes.contains("done"));
        classes.remove("missing").unwrap();
        assert_eq!(classes.len(), 0);
    }
}
