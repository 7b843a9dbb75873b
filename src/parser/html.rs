//! HTML 片段解析器

use crate::dom::Node;
use crate::error::{DomError, DomResult};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// 没有子节点、也不需要结束标签的元素
static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// 支持的命名字符引用
static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    [
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{a0}'),
    ]
    .into_iter()
    .collect()
});

pub(crate) fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name)
}

/// 元素嵌套的最大深度
pub const MAX_NESTING_DEPTH: usize = 512;

/// HTML 片段解析器
pub struct HtmlParser {
    input: Vec<char>,
    pos: usize,
    depth: usize,
}

impl HtmlParser {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    /// 解析出顶层节点列表
    pub fn parse(&mut self) -> DomResult<Vec<Node>> {
        let nodes = self.parse_nodes()?;

        if self.starts_with("</") {
            self.advance();
            self.advance();
            let tag = self.parse_tag_name();
            return Err(DomError::markup(format!("Unexpected closing tag </{}>", tag)));
        }

        Ok(nodes)
    }

    fn parse_nodes(&mut self) -> DomResult<Vec<Node>> {
        let mut nodes = Vec::new();

        while self.pos < self.input.len() {
            if self.starts_with("<!--") {
                nodes.push(self.parse_comment()?);
            } else if self.starts_with("</") {
                break; // 结束标签，返回上层
            } else if self.starts_with("<!") {
                self.skip_declaration();
            } else if self.current_char() == '<' && self.peek_char(1).is_ascii_alphabetic() {
                nodes.push(self.parse_element()?);
            } else if let Some(text) = self.parse_text() {
                nodes.push(text);
            }
        }

        Ok(nodes)
    }

    fn parse_element(&mut self) -> DomResult<Node> {
        self.expect('<')?;

        let tag_name = self.parse_tag_name().to_ascii_lowercase();
        let node = Node::new_element(&tag_name);

        // 解析属性
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                return Err(DomError::markup(format!(
                    "Unexpected end of input inside <{}>",
                    tag_name
                )));
            }
            if self.current_char() == '>' || self.starts_with("/>") {
                break;
            }

            let (name, value) = self.parse_attribute(&tag_name)?;
            node.insert_parsed_attribute(&name, &value);
        }

        // 自闭合标签
        if self.starts_with("/>") {
            self.advance();
            self.advance();
            return Ok(node);
        }

        self.expect('>')?;

        if is_void_element(&tag_name) {
            return Ok(node);
        }

        // 解析子节点
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DomError::markup(format!(
                "Nesting too deep: more than {} levels at <{}>",
                MAX_NESTING_DEPTH, tag_name
            )));
        }
        self.depth += 1;
        let children = self.parse_nodes();
        self.depth -= 1;
        for child in children? {
            node.append_child(&child)?;
        }

        // 解析结束标签
        if !self.starts_with("</") {
            return Err(DomError::markup(format!("Unclosed tag <{}>", tag_name)));
        }
        self.advance();
        self.advance();
        let end_tag = self.parse_tag_name().to_ascii_lowercase();
        if end_tag != tag_name {
            return Err(DomError::markup(format!(
                "Mismatched tags: <{}> closed by </{}>",
                tag_name, end_tag
            )));
        }
        self.skip_whitespace();
        self.expect('>')?;

        Ok(node)
    }

    fn parse_tag_name(&mut self) -> String {
        let mut name = String::new();
        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ':' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn parse_attribute(&mut self, tag_name: &str) -> DomResult<(String, String)> {
        let name = self.parse_attribute_name();
        if name.is_empty() {
            return Err(DomError::markup(format!(
                "Unexpected character '{}' inside <{}>",
                self.current_char(),
                tag_name
            )));
        }

        self.skip_whitespace();

        if self.current_char() != '=' {
            return Ok((name.to_ascii_lowercase(), String::new()));
        }

        self.advance(); // skip '='
        self.skip_whitespace();

        let value = self.parse_attribute_value();

        Ok((name.to_ascii_lowercase(), decode_entities(&value)))
    }

    fn parse_attribute_name(&mut self) -> String {
        let mut name = String::new();
        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\'' | '<') {
                break;
            }
            name.push(c);
            self.advance();
        }
        name
    }

    fn parse_attribute_value(&mut self) -> String {
        let quote = self.current_char();
        if quote != '"' && quote != '\'' {
            // 无引号值
            let mut value = String::new();
            while self.pos < self.input.len() {
                let c = self.current_char();
                if c.is_whitespace() || c == '>' || self.starts_with("/>") {
                    break;
                }
                value.push(c);
                self.advance();
            }
            return value;
        }

        self.advance(); // skip opening quote

        let mut value = String::new();
        while self.pos < self.input.len() && self.current_char() != quote {
            value.push(self.current_char());
            self.advance();
        }

        if self.pos < self.input.len() {
            self.advance(); // skip closing quote
        }

        value
    }

    fn parse_text(&mut self) -> Option<Node> {
        let mut text = String::new();
        while self.pos < self.input.len() {
            let c = self.current_char();
            let next = self.peek_char(1);
            if c == '<' && (next.is_ascii_alphabetic() || next == '/' || next == '!') {
                break;
            }
            text.push(c);
            self.advance();
        }

        // 标签之间的纯空白不保留
        if text.trim().is_empty() {
            None
        } else {
            Some(Node::new_text(&decode_entities(&text)))
        }
    }

    fn parse_comment(&mut self) -> DomResult<Node> {
        // Skip <!--
        for _ in 0..4 {
            self.advance();
        }

        let mut content = String::new();
        while self.pos < self.input.len() && !self.starts_with("-->") {
            content.push(self.current_char());
            self.advance();
        }

        if self.pos >= self.input.len() {
            return Err(DomError::markup("Unterminated comment"));
        }

        // Skip -->
        for _ in 0..3 {
            self.advance();
        }

        Ok(Node::new_comment(&content))
    }

    /// `<!DOCTYPE ...>` 之类的声明直接跳过
    fn skip_declaration(&mut self) {
        while self.pos < self.input.len() && self.current_char() != '>' {
            self.advance();
        }
        if self.pos < self.input.len() {
            self.advance();
        }
    }

    fn current_char(&self) -> char {
        self.peek_char(0)
    }

    fn peek_char(&self, offset: usize) -> char {
        self.input.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.input.get(self.pos + i) == Some(&c))
    }

    fn expect(&mut self, c: char) -> DomResult<()> {
        if self.current_char() == c {
            self.advance();
            Ok(())
        } else {
            Err(DomError::markup(format!(
                "Expected '{}', got '{}'",
                c,
                self.current_char()
            )))
        }
    }
}

/// 解码字符引用；无法识别的引用原样保留
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').and_then(|semi| {
            decode_reference(&after[..semi]).map(|c| (c, semi))
        }) {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(num) = reference.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES.get(reference).copied()
}
