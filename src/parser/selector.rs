//! CSS 选择器解析与匹配
//!
//! 支持类型、通配、`#id`、`.class`、属性选择器、`:scope`、`:first-child`、
//! `:last-child`、`:checked`，以及后代、`>`、`+`、`~` 组合符和逗号分隔的列表。

use crate::dom::Node;
use crate::error::{DomError, DomResult};

/// 属性选择器的比较方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    Id(String),
    Class(String),
    Attribute {
        name: String,
        matcher: Option<(AttrOp, String)>,
    },
    Scope,
    FirstChild,
    LastChild,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    // None 表示通配
    tag: Option<String>,
    simple: Vec<SimpleSelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

/// 一条复合链，从左到右；每个部分的组合符描述它与左侧部分的关系
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

/// 解析后的选择器列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> DomResult<Self> {
        let alternatives = SelectorParser::new(source).parse()?;
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 元素是否匹配。`scope` 是 `:scope` 所指的节点，缺省时指树根。
    pub fn matches(&self, element: &Node, scope: Option<&Node>) -> bool {
        element.is_element()
            && self.alternatives.iter().any(|complex| {
                matches_from(&complex.parts, complex.parts.len() - 1, element, scope)
            })
    }
}

fn matches_from(
    parts: &[(Combinator, Compound)],
    index: usize,
    element: &Node,
    scope: Option<&Node>,
) -> bool {
    let (combinator, compound) = &parts[index];
    if !compound.matches(element, scope) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match combinator {
        Combinator::Descendant => {
            let mut current = element.parent();
            while let Some(ancestor) = current {
                if matches_from(parts, index - 1, &ancestor, scope) {
                    return true;
                }
                current = ancestor.parent();
            }
            false
        }
        Combinator::Child => element
            .parent()
            .is_some_and(|parent| matches_from(parts, index - 1, &parent, scope)),
        Combinator::NextSibling => element
            .previous_element_sibling()
            .is_some_and(|sibling| matches_from(parts, index - 1, &sibling, scope)),
        Combinator::SubsequentSibling => {
            let mut current = element.previous_element_sibling();
            while let Some(sibling) = current {
                if matches_from(parts, index - 1, &sibling, scope) {
                    return true;
                }
                current = sibling.previous_element_sibling();
            }
            false
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.simple.is_empty()
    }

    fn matches(&self, element: &Node, scope: Option<&Node>) -> bool {
        if !element.is_element() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if element.tag_name() != *tag {
                return false;
            }
        }
        self.simple.iter().all(|s| s.matches(element, scope))
    }
}

impl SimpleSelector {
    fn matches(&self, element: &Node, scope: Option<&Node>) -> bool {
        match self {
            Self::Id(id) => element.id().as_deref() == Some(id.as_str()),
            Self::Class(class) => element.class_list().contains(class),
            Self::Attribute { name, matcher } => {
                let Some(value) = element.get_attribute(name) else {
                    return false;
                };
                match matcher {
                    None => true,
                    Some((AttrOp::Equals, expected)) => value == *expected,
                    Some((AttrOp::Includes, expected)) => {
                        value.split_whitespace().any(|v| v == expected.as_str())
                    }
                    Some((AttrOp::Prefix, expected)) => {
                        !expected.is_empty() && value.starts_with(expected.as_str())
                    }
                    Some((AttrOp::Suffix, expected)) => {
                        !expected.is_empty() && value.ends_with(expected.as_str())
                    }
                    Some((AttrOp::Substring, expected)) => {
                        !expected.is_empty() && value.contains(expected.as_str())
                    }
                }
            }
            Self::Scope => match scope {
                Some(scope) => scope.ptr_eq(element),
                None => element.parent().is_none(),
            },
            Self::FirstChild => {
                element.parent().is_some() && element.previous_element_sibling().is_none()
            }
            Self::LastChild => {
                element.parent().is_some() && element.next_element_sibling().is_none()
            }
            Self::Checked => element.checked(),
        }
    }
}

/// 选择器解析器
struct SelectorParser<'a> {
    source: &'a str,
    input: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.chars().collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> DomResult<Vec<Complex>> {
        let mut alternatives = Vec::new();

        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_complex()?);
            self.skip_whitespace();

            if self.pos >= self.input.len() {
                break;
            }
            if self.current_char() == ',' {
                self.advance();
                continue;
            }
            return Err(self.error(format!("unexpected '{}'", self.current_char())));
        }

        Ok(alternatives)
    }

    fn parse_complex(&mut self) -> DomResult<Complex> {
        let first = self.parse_compound()?;
        let mut parts = vec![(Combinator::Descendant, first)];

        loop {
            let had_whitespace = self.skip_whitespace();
            if self.pos >= self.input.len() || self.current_char() == ',' {
                break;
            }

            let combinator = match self.current_char() {
                '>' => Combinator::Child,
                '+' => Combinator::NextSibling,
                '~' => Combinator::SubsequentSibling,
                _ if had_whitespace => Combinator::Descendant,
                c => return Err(self.error(format!("unexpected '{}'", c))),
            };
            if combinator != Combinator::Descendant {
                self.advance();
                self.skip_whitespace();
            }

            parts.push((combinator, self.parse_compound()?));
        }

        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> DomResult<Compound> {
        let mut compound = Compound::default();
        let mut universal = false;

        if self.current_char() == '*' {
            self.advance();
            universal = true;
        } else if is_ident_char(self.current_char()) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }

        loop {
            match self.current_char() {
                '#' => {
                    self.advance();
                    compound.simple.push(SimpleSelector::Id(self.parse_ident()?));
                }
                '.' => {
                    self.advance();
                    compound.simple.push(SimpleSelector::Class(self.parse_ident()?));
                }
                '[' => {
                    self.advance();
                    compound.simple.push(self.parse_attribute()?);
                }
                ':' => {
                    self.advance();
                    let name = self.parse_ident()?.to_ascii_lowercase();
                    let pseudo = match name.as_str() {
                        "scope" => SimpleSelector::Scope,
                        "first-child" => SimpleSelector::FirstChild,
                        "last-child" => SimpleSelector::LastChild,
                        "checked" => SimpleSelector::Checked,
                        _ => {
                            return Err(
                                self.error(format!("unsupported pseudo-class ':{}'", name))
                            )
                        }
                    };
                    compound.simple.push(pseudo);
                }
                _ => break,
            }
        }

        if compound.is_empty() && !universal {
            return Err(self.error("expected a selector"));
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> DomResult<SimpleSelector> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.current_char() == ']' {
            self.advance();
            return Ok(SimpleSelector::Attribute { name, matcher: None });
        }

        let op = match self.current_char() {
            '=' => AttrOp::Equals,
            '~' => AttrOp::Includes,
            '^' => AttrOp::Prefix,
            '$' => AttrOp::Suffix,
            '*' => AttrOp::Substring,
            c => return Err(self.error(format!("unexpected '{}' in attribute selector", c))),
        };
        self.advance();
        if op != AttrOp::Equals {
            if self.current_char() != '=' {
                return Err(self.error("expected '=' in attribute selector"));
            }
            self.advance();
        }

        self.skip_whitespace();
        let value = match self.current_char() {
            '"' | '\'' => self.parse_quoted()?,
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        if self.current_char() != ']' {
            return Err(self.error("expected ']'"));
        }
        self.advance();

        Ok(SimpleSelector::Attribute {
            name,
            matcher: Some((op, value)),
        })
    }

    fn parse_quoted(&mut self) -> DomResult<String> {
        let quote = self.current_char();
        self.advance();
        let mut value = String::new();
        while self.pos < self.input.len() && self.current_char() != quote {
            value.push(self.current_char());
            self.advance();
        }
        if self.pos >= self.input.len() {
            return Err(self.error("unterminated string"));
        }
        self.advance();
        Ok(value)
    }

    fn parse_ident(&mut self) -> DomResult<String> {
        let mut ident = String::new();
        while self.pos < self.input.len() && is_ident_char(self.current_char()) {
            ident.push(self.current_char());
            self.advance();
        }
        if ident.is_empty() {
            return Err(self.error("expected an identifier"));
        }
        Ok(ident)
    }

    fn current_char(&self) -> char {
        self.input.get(self.pos).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// 跳过空白，返回是否跳过了字符
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.pos < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
        self.pos > start
    }

    fn error(&self, message: impl Into<String>) -> DomError {
        DomError::syntax(self.source, message)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
