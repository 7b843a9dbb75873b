//! 渲染器单元测试
//! 测试组件渲染流水线的各个阶段

use crate::dom::Node;
use crate::error::{DomError, RenderError};
use crate::event::Event;
use crate::renderer::{render, resolve_target, ComponentSpec, Renderer, Target};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 辅助函数：返回一个记录调用次数的处理函数
fn counter() -> (Rc<Cell<u32>>, impl Fn(&Node, &mut Event) + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move |_: &Node, _: &mut Event| c.set(c.get() + 1))
}

/// 测试完整示例：列表项 + 复选框
#[test]
fn test_list_item_scenario() {
    let (clicks, h) = counter();
    let spec = ComponentSpec::new("<li><input type='checkbox'/><label></label></li>")
        .attribute("id", "x")
        .modifier("item")
        .text("label", "Check")
        .on("input", "click", h);

    let li = render(&spec).unwrap();
    assert_eq!(
        li.outer_html(),
        r#"<li id="x" class="item"><input type="checkbox"><label>Check</label></li>"#
    );

    let input = li.query_selector("input").unwrap().unwrap();
    assert_eq!(input.listener_count("click"), 1);
    assert_eq!(li.listener_count("click"), 0);

    input.click();
    assert_eq!(clicks.get(), 1);
    // 点击根节点不会触发绑定在子节点上的处理函数
    li.click();
    assert_eq!(clicks.get(), 1);
}

/// 测试渲染结果是游离的
#[test]
fn test_rendered_root_is_detached() {
    let root = render(&ComponentSpec::new("<p>hi</p>")).unwrap();
    assert!(root.parent().is_none());
    assert_eq!(root.tag_name(), "p");
}

/// 测试模板中只取第一个顶层元素
#[test]
fn test_first_top_level_element_wins() {
    let root = render(&ComponentSpec::new("<!-- c --> <b>1</b><i>2</i>")).unwrap();
    assert_eq!(root.outer_html(), "<b>1</b>");
}

/// 测试空模板与纯文本模板
#[test]
fn test_parse_error_without_element() {
    for template in ["", "   ", "just text", "<!-- only a comment -->"] {
        let err = render(&ComponentSpec::new(template)).unwrap_err();
        assert!(matches!(err, RenderError::Parse { .. }), "{template:?}: {err}");
    }
}

/// 测试格式错误的模板
#[test]
fn test_parse_error_on_malformed_markup() {
    let err = render(&ComponentSpec::new("<li><span></li>")).unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }));
}

/// 测试嵌套过深的模板返回解析错误
#[test]
fn test_parse_error_on_deep_nesting() {
    let template = "<div>".repeat(2000) + &"</div>".repeat(2000);
    let err = render(&ComponentSpec::new(&template)).unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }), "{err}");

    let template = "<div>".repeat(100) + "<span></span>" + &"</div>".repeat(100);
    let root = render(&ComponentSpec::new(&template).text("span", "deep")).unwrap();
    assert_eq!(root.text_content(), "deep");
}

/// 测试属性覆盖模板中的同名属性
#[test]
fn test_attribute_overrides_template() {
    let spec = ComponentSpec::new(r#"<input type="checkbox" name="a">"#).attribute("type", "text");
    let input = render(&spec).unwrap();
    assert_eq!(input.get_attribute("type").as_deref(), Some("text"));
    // 覆盖保持原来的位置
    assert_eq!(input.outer_html(), r#"<input type="text" name="a">"#);
}

/// 测试非法属性名
#[test]
fn test_invalid_attribute_name() {
    let spec = ComponentSpec::new("<div></div>").attribute("bad name", "x");
    match render(&spec).unwrap_err() {
        RenderError::Attribute { name, source } => {
            assert_eq!(name, "bad name");
            assert_eq!(source, DomError::invalid_character("bad name"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// 测试重复修饰类只保留一份，顺序按首次出现
#[test]
fn test_modifiers_are_idempotent() {
    let spec = ComponentSpec::new(r#"<button class="btn"></button>"#)
        .modifier("btn")
        .modifier("btn-primary")
        .modifier("large")
        .modifier("btn-primary");
    let button = render(&spec).unwrap();

    let classes = button.class_list();
    assert_eq!(classes.len(), 3);
    assert_eq!(classes.to_vec(), vec!["btn", "btn-primary", "large"]);
}

/// 测试空修饰类被拒绝
#[test]
fn test_empty_modifier_rejected() {
    let err = render(&ComponentSpec::new("<div></div>").modifier("")).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Modifier {
            source: DomError::EmptyToken,
            ..
        }
    ));
}

/// 测试文本替换会清除原有子标记
#[test]
fn test_text_replacement_is_total() {
    let spec = ComponentSpec::new("<div><p>old <b>bold</b><i>x</i></p></div>").text("p", "new");
    let div = render(&spec).unwrap();
    let p = div.query_selector("p").unwrap().unwrap();

    assert_eq!(p.children().len(), 1);
    assert_eq!(p.inner_html(), "new");
    assert!(div.query_selector("b").unwrap().is_none());
}

/// 测试文本中的特殊字符按字面处理
#[test]
fn test_text_is_literal() {
    let spec = ComponentSpec::new("<p><span></span></p>").text("span", "<b>not markup</b>");
    let p = render(&spec).unwrap();
    assert!(p.query_selector("b").unwrap().is_none());
    assert_eq!(p.text_content(), "<b>not markup</b>");
    assert_eq!(p.inner_html(), "<span>&lt;b&gt;not markup&lt;/b&gt;</span>");
}

/// 测试文本选择器找不到时报错
#[test]
fn test_text_selector_miss_is_error() {
    let spec = ComponentSpec::new("<li><label></label></li>").text("span", "x");
    match render(&spec).unwrap_err() {
        RenderError::Selector { selector } => assert_eq!(selector, "span"),
        other => panic!("unexpected error: {other}"),
    }
}

/// 测试文本只能通过匹配根自身的选择器写到根上
#[test]
fn test_text_on_root_requires_self_match() {
    let scoped = render(&ComponentSpec::new("<button><span></span></button>").text(":scope", "Go"))
        .unwrap();
    assert_eq!(scoped.outer_html(), "<button>Go</button>");

    let by_tag = render(&ComponentSpec::new("<button></button>").text("button", "Go")).unwrap();
    assert_eq!(by_tag.text_content(), "Go");

    let err = render(&ComponentSpec::new("<button></button>").text(".missing", "Go")).unwrap_err();
    assert!(matches!(err, RenderError::Selector { .. }));
}

/// 测试后代优先于根
#[test]
fn test_text_prefers_descendant_over_root() {
    let spec = ComponentSpec::new("<div><div>inner</div></div>").text("div", "changed");
    let outer = render(&spec).unwrap();
    assert_eq!(outer.outer_html(), "<div><div>changed</div></div>");
}

/// 测试事件选择器找不到后代时绑定到根
#[test]
fn test_event_falls_back_to_root() {
    let (clicks, h) = counter();
    let spec = ComponentSpec::new("<button><span></span></button>")
        .text("span", "Click me")
        .on("button", "click", h);
    let button = render(&spec).unwrap();

    assert_eq!(button.listener_count("click"), 1);
    let span = button.query_selector("span").unwrap().unwrap();
    assert_eq!(span.listener_count("click"), 0);

    // 点击 span 冒泡到根
    span.click();
    assert_eq!(clicks.get(), 1);
}

/// 测试事件处理函数的 this 是注册的节点
#[test]
fn test_handler_receives_bound_node() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let spec = ComponentSpec::new("<ul><li class='a'></li><li class='b'></li></ul>").on(
        "li",
        "click",
        move |this, event| {
            s.borrow_mut().push((
                this.get_attribute("class"),
                event.target().map(|t| t.ptr_eq(this)),
            ));
        },
    );
    let ul = render(&spec).unwrap();
    let second = ul.query_selector(".b").unwrap().unwrap();
    second.click();
    assert!(seen.borrow().is_empty());

    ul.query_selector(".a").unwrap().unwrap().click();
    assert_eq!(*seen.borrow(), vec![(Some("a".to_string()), Some(true))]);
}

/// 测试同一目标上的多个绑定会累加
#[test]
fn test_event_bindings_accumulate() {
    let (clicks, h) = counter();
    let h = Rc::new(h);
    let (h1, h2) = (h.clone(), h.clone());
    let spec = ComponentSpec::new("<div><a></a></div>")
        .on("a", "click", move |n, e| h1(n, e))
        .on("a", "click", move |n, e| h2(n, e))
        .on("a", "mouseover", |_, _| {});
    let div = render(&spec).unwrap();
    let a = div.query_selector("a").unwrap().unwrap();

    assert_eq!(a.listener_count("click"), 2);
    assert_eq!(a.listener_count("mouseover"), 1);
    a.click();
    assert_eq!(clicks.get(), 2);
}

/// 测试非法事件类型和非法选择器
#[test]
fn test_event_errors_propagate() {
    let err = render(&ComponentSpec::new("<div></div>").on("div", "", |_, _| {})).unwrap_err();
    assert!(matches!(err, RenderError::Listener { .. }));

    let spec = ComponentSpec::new("<div></div>").on("div >", "click", |_, _| {});
    let err = render(&spec).unwrap_err();
    assert!(matches!(err, RenderError::InvalidSelector { .. }));

    let err = render(&ComponentSpec::new("<div></div>").text("[x", "y")).unwrap_err();
    assert!(matches!(err, RenderError::InvalidSelector { .. }));
}

/// 测试两次渲染得到互不影响的节点
#[test]
fn test_renders_are_independent() {
    let spec = ComponentSpec::new("<li><label></label></li>")
        .modifier("item")
        .text("label", "a");
    let first = render(&spec).unwrap();
    let second = Renderer::render(&spec).unwrap();

    assert!(!first.ptr_eq(&second));
    first.class_list().toggle("done").unwrap();
    first.query_selector("label").unwrap().unwrap().set_text_content("changed");

    assert!(!second.class_list().contains("done"));
    assert_eq!(second.text_content(), "a");
    assert_eq!(spec.template, "<li><label></label></li>");
}

/// 测试目标解析
#[test]
fn test_resolve_target() {
    let root = render(&ComponentSpec::new("<form><input name='q'></form>")).unwrap();

    let input = match resolve_target(&root, "input").unwrap() {
        Target::Descendant(node) => node,
        Target::Root => panic!("input should resolve to a descendant"),
    };
    assert_eq!(input.get_attribute("name").as_deref(), Some("q"));

    let target = resolve_target(&root, "form").unwrap();
    assert_eq!(target, Target::Root);
    assert!(target.node(&root).ptr_eq(&root));

    assert!(resolve_target(&root, "##").is_err());
}

/// 测试失败时不会留下挂载的节点
#[test]
fn test_failure_leaves_document_untouched() {
    let document = crate::dom::Document::from_html(r#"<div id="container"></div>"#).unwrap();
    let container = document.get_element_by_id("container").unwrap();

    let spec = ComponentSpec::new("<p></p>").modifier("note").text("span", "x");
    let err = render(&spec).unwrap_err();
    assert!(matches!(err, RenderError::Selector { .. }));

    assert!(container.children().is_empty());
    assert_eq!(document.to_html(), r#"<div id="container"></div>"#);
}
