use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::flash::{Flash, FLASH_KEY};

/// 按点分路径查找渲染数据
///
/// `flash.errors` 会先取 `flash` 字段，再取其中的 `errors`；
/// 数组段可以使用数字下标。路径不存在时返回 `None`，由调用方决定如何处理。
pub trait PathResolver {
    fn resolve(&self, path: &str) -> Option<&Value>;

    /// 以字符串序列的形式读取路径；非数组或不存在时返回 `None`
    fn resolve_sequence(&self, path: &str) -> Option<Vec<String>> {
        match self.resolve(path)? {
            Value::Array(items) => Some(items.iter().map(display_value).collect()),
            _ => None,
        }
    }
}

impl PathResolver for Value {
    fn resolve(&self, path: &str) -> Option<&Value> {
        walk(self, split_path(path))
    }
}

/// 在一个值上依次应用路径段
fn walk<'a, 'p>(
    mut current: &'a Value,
    segments: impl IntoIterator<Item = &'p str>,
) -> Option<&'a Value> {
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

/// 序列元素的文本形式，嵌套数组以 `, ` 连接
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// 传给模板层的数据树
#[derive(Clone, Debug, PartialEq)]
pub struct RenderData {
    root: Value,
}

impl Default for RenderData {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderData {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        if let Value::Object(map) = &mut self.root {
            map.insert(key.into(), value);
        }
        self
    }

    /// 序列化任意值后写入
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<&mut Self> {
        let value = serde_json::to_value(value)?;
        Ok(self.insert(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// 把 flash 映射绑定到保留名 `flash`，同时覆盖掉同名的旧值
    pub fn bind_flash(&mut self, flash: &Flash) -> &mut Self {
        self.insert(FLASH_KEY, flash.to_value())
    }

    /// 整棵数据树，作为模板引擎的渲染上下文
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl PathResolver for RenderData {
    fn resolve(&self, path: &str) -> Option<&Value> {
        self.root.resolve(path)
    }
}

impl From<Map<String, Value>> for RenderData {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            root: Value::Object(map),
        }
    }
}
