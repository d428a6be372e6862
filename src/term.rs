//! 词表术语访问接口
//!
//! 翻译引擎只通过 `get`/`set`/`id` 读写术语字段。源字段使用普通属性名，
//! 译文字段使用 `{field}_{language}` 形式。

use serde_json::{Map, Value};

use crate::api_constants::term_fields;

/// 术语字段值：单值字符串或有序的多值集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// 单个字符串
    Text(String),
    /// 多值字段（如同义词）
    List(Vec<String>),
}

impl FieldValue {
    /// 获取单值字符串
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

/// 词表术语读写接口（由索引流水线提供）
pub trait VocabularyTerm: Send {
    /// 术语ID，例如 `HP:0000118`
    fn id(&self) -> &str;

    /// 读取字段值
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// 写入字段值
    fn set(&mut self, field: &str, value: FieldValue);
}

/// 译文字段名：`{field}_{language}`
pub fn target_field(field: &str, language: &str) -> String {
    format!("{}_{}", field, language)
}

/// 基于JSON对象的术语实现，供命令行工具和测试使用
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTerm {
    id: String,
    fields: Map<String, Value>,
}

impl JsonTerm {
    /// 创建只有ID的空术语
    pub fn new(id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(term_fields::ID_FIELD.to_string(), Value::String(id.to_string()));
        Self {
            id: id.to_string(),
            fields,
        }
    }

    /// 链式设置字段
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value.into());
        self
    }

    /// 从JSON值构建术语，要求是带字符串 `id` 的对象
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => {
                let id = fields.get(term_fields::ID_FIELD)?.as_str()?.to_string();
                Some(Self { id, fields })
            }
            _ => None,
        }
    }

    /// 转换回JSON值
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl VocabularyTerm for JsonTerm {
    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match self.fields.get(field)? {
            Value::String(text) => Some(FieldValue::Text(text.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) {
        let json = match value {
            FieldValue::Text(text) => Value::String(text),
            FieldValue::List(values) => Value::Array(values.into_iter().map(Value::String).collect()),
        };
        self.fields.insert(field.to_string(), json);
    }
}
