//! 人工翻译索引模块
//!
//! 将人工校对的双语XLIFF资源（每个词表+语言一份）流式解析为
//! `术语ID -> {属性名 -> 译文}` 的查找表。解析过程是一个显式的三状态自动机：
//!
//! ```text
//! Idle --(trans-unit, id匹配)--> InUnit --(target)--> InTarget
//!  ^                              |  ^                   |
//!  +------(/trans-unit)-----------+  +----(/target)------+
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{info, warn};

use crate::api_constants::{storage_config, term_fields, xliff_format::*};
use crate::error::{Result, TranslationError};
use crate::translation_error;
use crate::unit_store::decode_unit_id;

/// 解析自动机状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseState {
    /// 不在任何翻译单元内
    #[default]
    Idle,
    /// 位于ID可识别的翻译单元内
    InUnit { term_id: String, attribute: String },
    /// 位于翻译单元的译文元素内，累积字符数据
    InTarget { term_id: String, attribute: String },
}

/// 自动机输入事件（与具体XML库无关）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    /// 翻译单元开始，携带 `id` 属性
    UnitStart(Option<&'a str>),
    /// 译文元素开始
    TargetStart,
    /// 字符数据
    Text(&'a str),
    /// 译文元素结束
    TargetEnd,
    /// 翻译单元结束
    UnitEnd,
}

/// 人工翻译查找表
#[derive(Debug, Default)]
pub struct HumanTranslationTable {
    entries: HashMap<String, HashMap<String, String>>,
    state: ParseState,
}

impl HumanTranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前自动机状态
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// 推进自动机
    pub fn feed(&mut self, event: ParseEvent<'_>) {
        let state = std::mem::take(&mut self.state);
        self.state = match (state, event) {
            (ParseState::Idle, ParseEvent::UnitStart(id)) => {
                match id.and_then(decode_unit_id) {
                    Some((term_id, attribute)) => ParseState::InUnit { term_id, attribute },
                    None => ParseState::Idle,
                }
            }
            (ParseState::InUnit { term_id, attribute }, ParseEvent::TargetStart) => {
                ParseState::InTarget { term_id, attribute }
            }
            (ParseState::InTarget { term_id, attribute }, ParseEvent::Text(text)) => {
                self.entries
                    .entry(term_id.clone())
                    .or_default()
                    .entry(attribute.clone())
                    .or_default()
                    .push_str(text);
                ParseState::InTarget { term_id, attribute }
            }
            (ParseState::InTarget { term_id, attribute }, ParseEvent::TargetEnd) => {
                ParseState::InUnit { term_id, attribute }
            }
            (_, ParseEvent::UnitEnd) => ParseState::Idle,
            (state, _) => state,
        };
    }

    /// 查询术语某个属性的人工译文
    pub fn get(&self, term_id: &str, attribute: &str) -> Option<&str> {
        self.entries.get(term_id)?.get(attribute).map(String::as_str)
    }

    /// 查询术语的全部人工译文
    pub fn entry(&self, term_id: &str) -> Option<&HashMap<String, String>> {
        self.entries.get(term_id)
    }

    /// 查询术语字段对应的人工译文（`name` 对应 `label`，`def` 对应 `definition`）
    pub fn get_field(&self, term_id: &str, field: &str) -> Option<&str> {
        self.get(term_id, attribute_for_field(field))
    }

    /// 收录的术语数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 术语字段名到资源属性名的映射
pub fn attribute_for_field(field: &str) -> &str {
    match field {
        term_fields::NAME_FIELD => term_fields::LABEL_ATTR,
        term_fields::DEFINITION_FIELD => term_fields::DEFINITION_ATTR,
        other => other,
    }
}

/// 人工翻译资源文件路径：`{resources_dir}/{vocabulary}_{language}.xliff`
pub fn resource_path(resources_dir: &Path, vocabulary: &str, language: &str) -> PathBuf {
    resources_dir.join(format!(
        "{}_{}.{}",
        vocabulary,
        language,
        storage_config::XLIFF_EXTENSION
    ))
}

/// 加载某个词表+语言的人工翻译资源
///
/// 资源缺失不是错误：记录警告并返回空表。XML格式错误会直接返回错误。
pub fn load(resources_dir: &Path, vocabulary: &str, language: &str) -> Result<HumanTranslationTable> {
    let path = resource_path(resources_dir, vocabulary, language);
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("⚠️  未找到人工翻译资源: {}，全部术语将使用机器翻译", path.display());
            return Ok(HumanTranslationTable::new());
        }
        Err(e) => return Err(translation_error!(file_op, path.display(), "读取", e)),
    };

    let table = parse(BufReader::new(file), &path.display().to_string())?;
    info!("📖 人工翻译资源已加载: {} ({} 个术语)", path.display(), table.len());
    Ok(table)
}

/// 流式解析人工翻译资源
pub fn parse<R: BufRead>(input: R, origin: &str) -> Result<HumanTranslationTable> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut table = HumanTranslationTable::new();
    let mut depth = 0usize;
    // 当前 trans-unit 所在深度；只有它的直接子元素 target 才推进自动机
    let mut unit_depth: Option<usize> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| TranslationError::from(e).at_path(origin))?;

        match event {
            Event::Start(element) => {
                depth += 1;
                match element.local_name().as_ref() {
                    tag if tag == UNIT_TAG.as_bytes() => {
                        let id = unit_id(&element, origin)?;
                        unit_depth = Some(depth);
                        table.feed(ParseEvent::UnitStart(id.as_deref()));
                    }
                    tag if tag == TARGET_TAG.as_bytes() && unit_depth.map_or(false, |d| depth == d + 1) => {
                        table.feed(ParseEvent::TargetStart)
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if matches!(table.state, ParseState::InTarget { .. }) {
                    let decoded = text
                        .unescape()
                        .map_err(|e| translation_error!(xml_parse, origin, e))?;
                    table.feed(ParseEvent::Text(&decoded));
                }
            }
            Event::CData(data) => {
                table.feed(ParseEvent::Text(&String::from_utf8_lossy(&data)));
            }
            Event::End(element) => {
                match element.local_name().as_ref() {
                    tag if tag == UNIT_TAG.as_bytes() => {
                        unit_depth = None;
                        table.feed(ParseEvent::UnitEnd);
                    }
                    tag if tag == TARGET_TAG.as_bytes() && unit_depth.map_or(false, |d| depth == d + 1) => {
                        table.feed(ParseEvent::TargetEnd)
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(translation_error!(xml_parse, origin, "文档意外结束，存在未闭合的元素"));
    }

    Ok(table)
}

fn unit_id(element: &BytesStart<'_>, origin: &str) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute(ID_ATTR)
        .map_err(|e| translation_error!(xml_parse, origin, e))?;
    match attr {
        Some(attr) => Ok(Some(
            attr.unescape_value()
                .map_err(|e| translation_error!(xml_parse, origin, e))?
                .into_owned(),
        )),
        None => Ok(None),
    }
}
