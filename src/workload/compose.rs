//! 将依赖结果组合为父请求的请求体

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ComposeError {
    #[error("useData set to true, but data value not set")]
    MissingTemplate,

    #[error("data template must contain exactly one %s, found {0}")]
    SubstitutionSites(usize),

    #[error("dependency result {index} is not valid JSON: {message}")]
    InvalidJson { index: usize, message: String },
}

/// 依赖结果的组合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition<'a> {
    /// 用分隔符拼接后代入模板
    Join { separator: &'a str },
    /// 逐个解析为 JSON 后组成一个数组
    Array,
}

impl<'a> Composition<'a> {
    pub fn new(do_join: bool, separator: &'a str) -> Self {
        if do_join {
            Composition::Join { separator }
        } else {
            Composition::Array
        }
    }
}

/// 根据 `template` 与有序的 `dataset` 构建父请求体
///
/// 两种模式下模板都不能为空；数组模式忽略模板内容，直接替换整个请求体。
pub fn compose(
    template: &str,
    dataset: &[String],
    mode: Composition<'_>,
) -> Result<String, ComposeError> {
    if template.is_empty() {
        return Err(ComposeError::MissingTemplate);
    }
    match mode {
        Composition::Join { separator } => substitute(template, &dataset.join(separator)),
        Composition::Array => json_array(dataset),
    }
}

fn template_regex() -> &'static Regex {
    static TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();
    TEMPLATE_REGEX.get_or_init(|| Regex::new(r"%[%sv]").unwrap())
}

/// 替换 `template` 中唯一的 `%s`（或 `%v`），`%%` 表示字面量 `%`
pub fn substitute(template: &str, value: &str) -> Result<String, ComposeError> {
    let re = template_regex();
    let sites = re.find_iter(template).filter(|m| m.as_str() != "%%").count();
    if sites != 1 {
        return Err(ComposeError::SubstitutionSites(sites));
    }

    Ok(re
        .replace_all(template, |caps: &regex::Captures| {
            if &caps[0] == "%%" {
                "%".to_string()
            } else {
                value.to_string()
            }
        })
        .into_owned())
}

/// 把多个 JSON 片段重新编码为一个 JSON 数组
pub fn json_array(dataset: &[String]) -> Result<String, ComposeError> {
    let values = dataset
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_str::<serde_json::Value>(item).map_err(|e| {
                ComposeError::InvalidJson {
                    index,
                    message: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(serde_json::Value::Array(values).to_string())
}
