//! 工作负载、依赖、请求三层 header 的合并
//!
//! 所有函数都基于 [`HeaderMap`]，名称本身大小写不敏感。
//! "覆盖" 一律是先删除再添加：source 中出现的名称会替换 target 中该名称的全部值。

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// 用 `source` 中的所有 header 覆盖 `target`
pub fn overlay(target: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        target.remove(name);
        for value in source.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// 只覆盖 `names` 中列出的 header（取自 `source`）
///
/// `source` 中不存在的名称不影响 `target`；非法名称记录警告后跳过。
pub fn overlay_named<S: AsRef<str>>(target: &mut HeaderMap, source: &HeaderMap, names: &[S]) {
    for raw in names {
        let raw = raw.as_ref();
        let Ok(name) = HeaderName::from_bytes(raw.trim().as_bytes()) else {
            warn!(header = raw, "skipping invalid dependency header name");
            continue;
        };
        if !source.contains_key(&name) {
            continue;
        }
        target.remove(&name);
        for value in source.get_all(&name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// 按优先级从低到高叠加三层 header
pub fn merge(inherited: HeaderMap, dependency: &HeaderMap, request: &HeaderMap) -> HeaderMap {
    let mut effective = inherited;
    overlay(&mut effective, dependency);
    overlay(&mut effective, request);
    effective
}

/// `name -> [values]` 格式 header 的 serde 适配
///
/// 单个字符串等同于只有一个元素的列表，`null` 视为空。无法构成合法 header 的条目会被丢弃。
pub mod header_map {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (k, v) in headers.iter() {
            let value = String::from_utf8_lossy(v.as_bytes()).into_owned();
            map.entry(k.as_str()).or_default().push(value);
        }
        map.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: Option<BTreeMap<String, OneOrMany>> = Option::deserialize(deserializer)?;
        let mut headers = HeaderMap::new();
        for (k, v) in map.unwrap_or_default() {
            let Ok(name) = HeaderName::from_bytes(k.as_bytes()) else {
                warn!(header = %k, "dropping invalid header name");
                continue;
            };
            let values = match v {
                OneOrMany::One(value) => vec![value],
                OneOrMany::Many(values) => values,
            };
            for value in values {
                match HeaderValue::from_str(&value) {
                    Ok(value) => {
                        headers.append(name.clone(), value);
                    }
                    Err(_) => warn!(header = %name, "dropping invalid header value"),
                }
            }
        }
        Ok(headers)
    }
}
