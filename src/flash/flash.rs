use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单个分类下的消息序列
pub type FlashMessages = Vec<String>;

/// Flash 消息存储
///
/// 每个请求独占一个实例：按分类 key 聚合消息，分类内保持追加顺序。
/// `add` 是唯一会改变内容的操作，消息只会随实例一起被丢弃。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flash {
    data: BTreeMap<String, FlashMessages>,
    #[serde(skip)]
    delivered: bool,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    /// 向 `key` 分类追加一条消息，分类不存在时自动创建
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.data.entry(key.into()).or_default().push(message.into());
        self
    }

    /// 读取某个分类；不存在时返回空切片
    pub fn get(&self, key: &str) -> &[String] {
        self.data.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 拷贝出当前映射，调用方无法借此修改内部状态
    pub fn as_map(&self) -> BTreeMap<String, FlashMessages> {
        self.data.clone()
    }

    /// 模板渲染使用的 JSON 视图：`{ "<key>": ["msg", ...] }`
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.data
                .iter()
                .map(|(key, messages)| {
                    let items = messages.iter().cloned().map(Value::String).collect();
                    (key.clone(), Value::Array(items))
                })
                .collect(),
        )
    }

    /// 本次请求是否已经通过渲染把消息展示给用户
    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    pub(crate) fn mark_delivered(&mut self) {
        self.delivered = true;
    }

    pub(crate) fn from_map(data: BTreeMap<String, FlashMessages>) -> Self {
        Self {
            data,
            delivered: false,
        }
    }
}

impl PartialEq for Flash {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Flash {}

impl PartialEq<BTreeMap<String, FlashMessages>> for Flash {
    fn eq(&self, other: &BTreeMap<String, FlashMessages>) -> bool {
        &self.data == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Vec<&str>)>) -> BTreeMap<String, FlashMessages> {
        entries
            .into_iter()
            .map(|(key, messages)| {
                (
                    key.to_string(),
                    messages.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn new_flash_is_empty() {
        let flash = Flash::new();
        assert!(flash.is_empty());
        assert_eq!(flash.as_map(), BTreeMap::new());
        assert!(flash.get("error").is_empty());
    }

    #[test]
    fn add_appends_in_call_order() {
        let mut flash = Flash::new();
        flash.add("error", "something");
        assert_eq!(flash, map(vec![("error", vec!["something"])]));

        flash.add("error", "other");
        assert_eq!(flash, map(vec![("error", vec!["something", "other"])]));
    }

    #[test]
    fn add_keeps_categories_apart() {
        let mut flash = Flash::new();
        flash
            .add("error", "bad")
            .add("success", "good")
            .add("error", "worse")
            .add("", "");

        assert_eq!(
            flash.as_map(),
            map(vec![
                ("", vec![""]),
                ("error", vec!["bad", "worse"]),
                ("success", vec!["good"]),
            ])
        );
        assert_eq!(flash.len(), 4);
        assert_eq!(flash.keys().collect::<Vec<_>>(), vec!["", "error", "success"]);
    }

    #[test]
    fn as_map_is_a_copy() {
        let mut flash = Flash::new();
        flash.add("info", "hello");

        let mut copy = flash.as_map();
        copy.entry("info".to_string()).or_default().push("tampered".into());
        copy.insert("other".into(), vec!["x".into()]);

        assert_eq!(flash.get("info"), ["hello".to_string()]);
        assert!(!flash.contains_key("other"));
    }

    #[test]
    fn equality_ignores_delivery_state() {
        let mut left = Flash::new();
        left.add("a", "1");
        let mut right = left.clone();
        right.mark_delivered();
        assert_eq!(left, right);
        assert!(right.is_delivered());
        assert!(!left.is_delivered());
    }

    #[test]
    fn to_value_exposes_arrays() {
        let mut flash = Flash::new();
        flash.add("errors", "A").add("errors", "B");
        assert_eq!(
            flash.to_value(),
            serde_json::json!({ "errors": ["A", "B"] })
        );
    }
}
