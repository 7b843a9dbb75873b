//! 组件渲染演示程序
//!
//! 加载组件清单（默认使用内置的 sample/components.json），渲染后挂载到
//! `#container`，再模拟几次点击并输出最终的文档标记。

use mini_component::{render, Document, HandlerRegistry, ManifestFile};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let manifest = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "Loading manifest");
            ManifestFile::from_path(&path)?
        }
        None => ManifestFile::from_json_str(include_str!("../../sample/components.json"))?,
    };

    let alerts = Rc::new(RefCell::new(Vec::new()));
    let registry = demo_handlers(alerts.clone());

    let document = Document::from_html(r#"<div id="container"></div>"#)?;
    let container = document
        .get_element_by_id("container")
        .ok_or("document has no #container")?;

    for (name, spec) in manifest.specs(&registry)? {
        let element = render(&spec)?;
        container.append_child(&element)?;
        info!(component = %name, tag = %element.tag_name(), "Mounted component");
    }
    println!("{}\n", document.to_html());

    // 模拟点击
    if let Some(button) = document.query_selector("#my-button")? {
        button.click();
    }
    if let Some(checkbox) = document.query_selector("#my-list-item input")? {
        checkbox.click();
        println!("{}\n", document.to_html());
        checkbox.click();
    }

    println!("{}", document.to_html());
    for message in alerts.borrow().iter() {
        println!("[alert] {}", message);
    }

    Ok(())
}

fn demo_handlers(alerts: Rc<RefCell<Vec<String>>>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register("alertClicked", move |_this, _event| {
        alerts.borrow_mut().push("You clicked the button".to_string());
    });

    // 勾选时划掉后面的 label，取消勾选时恢复
    registry.register("toggleStrikethrough", |this, _event| {
        if let Some(label) = this.next_element_sibling() {
            let decoration = if this.checked() { "line-through" } else { "none" };
            label.style().set_property("textDecoration", decoration);
            info!(decoration, "Toggled label decoration");
        }
    });

    registry
}
