//! 翻译单元存储模块
//!
//! 负责翻译记忆文件（XLIFF 1.2）的读取与写出：
//! - 翻译单元ID形如 `HP_0000118_name`，对应术语 `HP:0000118` 的 `name` 字段
//! - 只有能按上述格式往返编码的术语ID才允许写入
//! - 读取时流式解析，无法识别的单元ID会被跳过
//! - 写出时按键排序，保证输出稳定

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::LazyLock;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use tracing::{debug, warn};

use crate::api_constants::xliff_format::*;
use crate::error::{Result, TranslationError};
use crate::translation_error;

/// 翻译单元ID模式：`{前缀}_{本地ID}_{属性名}`，本地ID如 `0000118`、`PS100100`
static UNIT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9]*)_([A-Za-z0-9]+)_(.+)$").expect("翻译单元ID正则表达式无效")
});

/// 将翻译单元ID拆分为 (术语ID, 属性名)
///
/// ```rust
/// use vocab_translation::unit_store::decode_unit_id;
///
/// assert_eq!(
///     decode_unit_id("HP_0000118_name"),
///     Some(("HP:0000118".to_string(), "name".to_string()))
/// );
/// assert_eq!(decode_unit_id("not-a-term"), None);
/// ```
pub fn decode_unit_id(id: &str) -> Option<(String, String)> {
    let captures = UNIT_ID_PATTERN.captures(id)?;
    let term_id = format!("{}:{}", &captures[1], &captures[2]);
    Some((term_id, captures[3].to_string()))
}

/// 由术语ID和属性名生成翻译单元ID
pub fn encode_unit_id(term_id: &str, field: &str) -> String {
    format!("{}_{}", term_id.replacen(':', "_", 1), field)
}

/// 检查 (术语ID, 字段) 写出后能否原样读回
pub fn check_unit_key(term_id: &str, field: &str) -> Result<()> {
    let id = encode_unit_id(term_id, field);
    match decode_unit_id(&id) {
        Some((decoded_term, decoded_field)) if decoded_term == term_id && decoded_field == field => {
            Ok(())
        }
        _ => Err(translation_error!(
            unsupported,
            format!("术语ID无法编码为翻译单元ID: {} ({})", term_id, field)
        )),
    }
}

/// 翻译单元键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    pub term_id: String,
    pub field: String,
}

impl UnitKey {
    pub fn new(term_id: &str, field: &str) -> Self {
        Self {
            term_id: term_id.to_string(),
            field: field.to_string(),
        }
    }
}

/// 单条翻译单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// 原文
    pub source: String,
    /// 译文
    pub target: String,
}

/// 一个词表+语言的全部翻译单元
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitTable {
    units: BTreeMap<UnitKey, TranslationUnit>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term_id: &str, field: &str) -> Option<&TranslationUnit> {
        self.units.get(&UnitKey::new(term_id, field))
    }

    /// 插入或覆盖翻译单元
    pub fn insert(&mut self, term_id: &str, field: &str, source: &str, target: &str) {
        self.units.insert(
            UnitKey::new(term_id, field),
            TranslationUnit {
                source: source.to_string(),
                target: target.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitKey, &TranslationUnit)> {
        self.units.iter()
    }
}

/// 写出文件时 `<file>` 元素上的元数据
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub vocabulary: String,
    pub source_language: String,
    pub target_language: String,
}

/// 当前正在读取的单元内子元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Source,
    Target,
}

/// 当前正在读取的翻译单元
struct PendingUnit {
    key: UnitKey,
    /// `trans-unit` 元素所在深度
    depth: usize,
    source: String,
    target: Option<String>,
    capture: Capture,
}

/// 从文件读取翻译单元；文件不存在时返回 `None`
pub fn read_units(path: &Path) -> Result<Option<UnitTable>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(translation_error!(file_op, path.display(), "读取", e)),
    };

    let table = parse_units(BufReader::new(file), &path.display().to_string())?;
    debug!("读取翻译记忆: {} ({} 个单元)", path.display(), table.len());
    Ok(Some(table))
}

/// 流式解析XLIFF文档中的翻译单元
pub fn parse_units<R: BufRead>(input: R, origin: &str) -> Result<UnitTable> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut table = UnitTable::new();
    let mut pending: Option<PendingUnit> = None;
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| TranslationError::from(e).at_path(origin))?;

        match event {
            Event::Start(element) => {
                depth += 1;
                let name = element.local_name();
                if name.as_ref() == UNIT_TAG.as_bytes() {
                    pending = start_unit(&element, depth, origin)?;
                } else if let Some(unit) = pending.as_mut().filter(|u| depth == u.depth + 1) {
                    // 只读取 trans-unit 的直接子元素，忽略 alt-trans 等嵌套内容
                    match name.as_ref() {
                        tag if tag == SOURCE_TAG.as_bytes() => unit.capture = Capture::Source,
                        tag if tag == TARGET_TAG.as_bytes() => {
                            unit.capture = Capture::Target;
                            unit.target.get_or_insert_with(String::new);
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(element) => {
                if element.local_name().as_ref() == TARGET_TAG.as_bytes() {
                    if let Some(unit) = pending.as_mut().filter(|u| depth == u.depth) {
                        unit.target.get_or_insert_with(String::new);
                    }
                }
            }
            Event::Text(text) => {
                if let Some(unit) = pending.as_mut() {
                    if unit.capture != Capture::None {
                        let decoded = text
                            .unescape()
                            .map_err(|e| translation_error!(xml_parse, origin, e))?;
                        unit.append(&decoded);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(unit) = pending.as_mut() {
                    if unit.capture != Capture::None {
                        unit.append(&String::from_utf8_lossy(&data));
                    }
                }
            }
            Event::End(element) => {
                match element.local_name().as_ref() {
                    tag if tag == UNIT_TAG.as_bytes() => {
                        if let Some(unit) = pending.take() {
                            finish_unit(&mut table, unit);
                        }
                    }
                    tag if tag == SOURCE_TAG.as_bytes() || tag == TARGET_TAG.as_bytes() => {
                        if let Some(unit) = pending.as_mut().filter(|u| depth == u.depth + 1) {
                            unit.capture = Capture::None;
                        }
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

impl PendingUnit {
    fn append(&mut self, text: &str) {
        match self.capture {
            Capture::Source => self.source.push_str(text),
            Capture::Target => self.target.get_or_insert_with(String::new).push_str(text),
            Capture::None => {}
        }
    }
}

fn start_unit(element: &BytesStart<'_>, depth: usize, origin: &str) -> Result<Option<PendingUnit>> {
    let id = match element
        .try_get_attribute(ID_ATTR)
        .map_err(|e| translation_error!(xml_parse, origin, e))?
    {
        Some(attr) => attr
            .unescape_value()
            .map_err(|e| translation_error!(xml_parse, origin, e))?
            .into_owned(),
        None => {
            warn!("⚠️  翻译单元缺少id属性，已跳过 ({})", origin);
            return Ok(None);
        }
    };

    match decode_unit_id(&id) {
        Some((term_id, field)) => Ok(Some(PendingUnit {
            key: UnitKey { term_id, field },
            depth,
            source: String::new(),
            target: None,
            capture: Capture::None,
        })),
        None => {
            warn!("⚠️  无法识别的翻译单元ID: {} ({})", id, origin);
            Ok(None)
        }
    }
}

fn finish_unit(table: &mut UnitTable, unit: PendingUnit) {
    match unit.target {
        Some(target) => {
            table.units.insert(
                unit.key,
                TranslationUnit {
                    source: unit.source,
                    target,
                },
            );
        }
        None => debug!("翻译单元缺少译文，已跳过: {}/{}", unit.key.term_id, unit.key.field),
    }
}

/// 将翻译单元序列化为XLIFF文档
pub fn write_units(table: &UnitTable, info: &DocumentInfo) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let date = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let mut emit = |event: Event<'_>| -> Result<()> {
        writer
            .write_event(event)
            .map_err(|e| translation_error!(file_op, info.vocabulary.as_str(), "序列化", e))
    };

    emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(Event::Start(
        BytesStart::new(ROOT_TAG).with_attributes([("version", VERSION), ("xmlns", XMLNS)]),
    ))?;
    emit(Event::Start(BytesStart::new(FILE_TAG).with_attributes([
        ("original", info.vocabulary.as_str()),
        ("source-language", info.source_language.as_str()),
        ("target-language", info.target_language.as_str()),
        ("datatype", "plaintext"),
        ("date", date.as_str()),
    ])))?;
    emit(Event::Start(BytesStart::new(BODY_TAG)))?;

    for (key, unit) in table.iter() {
        let id = encode_unit_id(&key.term_id, &key.field);
        emit(Event::Start(
            BytesStart::new(UNIT_TAG).with_attributes([(ID_ATTR, id.as_str())]),
        ))?;
        emit(Event::Start(BytesStart::new(SOURCE_TAG)))?;
        emit(Event::Text(BytesText::new(&unit.source)))?;
        emit(Event::End(BytesEnd::new(SOURCE_TAG)))?;
        emit(Event::Start(BytesStart::new(TARGET_TAG)))?;
        emit(Event::Text(BytesText::new(&unit.target)))?;
        emit(Event::End(BytesEnd::new(TARGET_TAG)))?;
        emit(Event::End(BytesEnd::new(UNIT_TAG)))?;
    }

    emit(Event::End(BytesEnd::new(BODY_TAG)))?;
    emit(Event::End(BytesEnd::new(FILE_TAG)))?;
    emit(Event::End(BytesEnd::new(ROOT_TAG)))?;
    drop(emit);

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}
