//! 组件清单
//!
//! JSON 形式的组件描述。事件处理函数以名字引用，渲染前通过
//! [`HandlerRegistry`] 解析成真正的回调。

use crate::dom::Node;
use crate::error::ConfigError;
use crate::event::{Event, EventHandler};
use crate::renderer::{ComponentSpec, EventBinding};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// 单个组件的清单
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    pub template: String,
    #[serde(default, alias = "params")]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub text: IndexMap<String, String>,
    #[serde(default)]
    pub events: Vec<EventManifest>,
}

/// 事件绑定清单，`handler` 是注册表中的名字
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventManifest {
    #[serde(alias = "tag")]
    pub selector: String,
    #[serde(alias = "type")]
    pub event_type: String,
    pub handler: String,
}

/// 清单文件：组件名 → 组件清单，保持文件中的顺序
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ManifestFile {
    #[serde(default)]
    pub components: IndexMap<String, ComponentManifest>,
}

impl ManifestFile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn component(&self, name: &str) -> Result<&ComponentManifest, ConfigError> {
        self.components
            .get(name)
            .ok_or_else(|| ConfigError::unknown_component(name))
    }

    /// 按文件顺序把全部组件解析成渲染描述
    pub fn specs(
        &self,
        registry: &HandlerRegistry,
    ) -> Result<Vec<(String, ComponentSpec)>, ConfigError> {
        let mut specs = Vec::with_capacity(self.components.len());
        for (name, manifest) in &self.components {
            specs.push((name.clone(), manifest.to_spec(registry)?));
        }
        Ok(specs)
    }
}

impl ComponentManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_spec(&self, registry: &HandlerRegistry) -> Result<ComponentSpec, ConfigError> {
        let mut events = Vec::with_capacity(self.events.len());
        for event in &self.events {
            let handler = registry
                .get(&event.handler)
                .ok_or_else(|| ConfigError::unknown_handler(&event.handler))?;
            events.push(EventBinding::new(&event.selector, &event.event_type, handler));
        }

        Ok(ComponentSpec {
            template: self.template.clone(),
            attributes: self.attributes.clone(),
            modifiers: self.modifiers.clone(),
            text: self.text.clone(),
            events,
        })
    }
}

/// 处理函数注册表
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, EventHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理函数，同名覆盖
    pub fn register<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&Node, &mut Event) + 'static,
    {
        self.handlers.insert(name.to_string(), Rc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<EventHandler> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}
