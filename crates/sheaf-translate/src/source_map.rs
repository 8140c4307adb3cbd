use std::sync::Arc;

use serde::Serialize;
use sheaf_ast::SourceInfo;

use crate::Emitter;

/// A position in the serialized output: 1-based line, 0-based byte column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A position in a parsed source: 1-based line, 0-based byte column.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OriginalPosition {
    pub source: Arc<str>,
    pub line: u32,
    pub column: u32,
}

/// Output from `generated` on comes from `original`, or from no source at
/// all when `original` is `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mapping {
    pub generated: Position,
    pub original: Option<OriginalPosition>,
}

/// Generated-to-original mappings, ordered by generated position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SourceMap {
    sources: Vec<Arc<str>>,
    mappings: Vec<Mapping>,
}

#[derive(Serialize)]
struct RawSourceMap<'a> {
    version: u8,
    sources: Vec<&'a str>,
    names: Vec<&'a str>,
    mappings: String,
}

impl SourceMap {
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Source names in order of first use.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|source| &**source)
    }

    /// Version 3 source map JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&RawSourceMap {
            version: 3,
            sources: self.sources().collect(),
            names: Vec::new(),
            mappings: self.encode_mappings(),
        })
    }

    /// The `mappings` field: `;` between generated lines, `,` between
    /// segments, each segment a run of base64 VLQ deltas.
    pub fn encode_mappings(&self) -> String {
        let mut out = String::new();
        let mut line = 1;
        let mut column = 0;
        let mut source = 0;
        let mut original_line = 0;
        let mut original_column = 0;

        for (index, mapping) in self.mappings.iter().enumerate() {
            if mapping.generated.line != line {
                column = 0;
                while line < mapping.generated.line {
                    out.push(';');
                    line += 1;
                }
            } else if index > 0 {
                if self.mappings[index - 1] == *mapping {
                    continue;
                }
                out.push(',');
            }

            encode_vlq(&mut out, i64::from(mapping.generated.column) - column);
            column = i64::from(mapping.generated.column);

            let Some(original) = &mapping.original else { continue };
            let source_index = self.source_index(&original.source);
            encode_vlq(&mut out, source_index - source);
            source = source_index;

            let source_line = i64::from(original.line) - 1;
            encode_vlq(&mut out, source_line - original_line);
            original_line = source_line;

            encode_vlq(&mut out, i64::from(original.column) - original_column);
            original_column = i64::from(original.column);
        }

        out
    }

    fn source_index(&self, source: &str) -> i64 {
        self.sources.iter().position(|known| &**known == source).map_or(0, |index| index as i64)
    }
}

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn encode_vlq(out: &mut String, value: i64) {
    let mut rest = if value < 0 { (value.unsigned_abs() << 1) | 1 } else { (value as u64) << 1 };

    loop {
        let mut digit = (rest & 0b11111) as usize;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b100000;
        }
        out.push(char::from(BASE64[digit]));
        if rest == 0 {
            break;
        }
    }
}

/// Collects serialized text and mappings.
///
/// A mapping is added whenever positioned text starts from a different
/// original position than the last positioned text, and when output leaves
/// positioned text for text without a position.
pub(crate) struct Builder {
    text: String,
    generated: Position,
    groups: Vec<Option<OriginalPosition>>,
    last_original: Option<(u32, u32)>,
    active: bool,
    map: SourceMap,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            text: String::new(),
            generated: Position { line: 1, column: 0 },
            groups: Vec::new(),
            last_original: None,
            active: false,
            map: SourceMap::default(),
        }
    }

    pub(crate) fn finish(self) -> (String, SourceMap) {
        (self.text, self.map)
    }

    fn add(&mut self, original: Option<OriginalPosition>) {
        if let Some(original) = &original {
            if !self.map.sources.contains(&original.source) {
                self.map.sources.push(original.source.clone());
            }
        }
        self.map.mappings.push(Mapping { generated: self.generated, original });
    }
}

impl Emitter for Builder {
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.groups.last().cloned().flatten() {
            Some(original) => {
                let at = (original.line, original.column);
                if self.last_original != Some(at) {
                    self.add(Some(original));
                }
                self.last_original = Some(at);
                self.active = true;
            }
            None if self.active => {
                self.add(None);
                self.active = false;
            }
            None => {}
        }

        self.text.push_str(text);
        match text.rfind('\n') {
            Some(last) => {
                self.generated.line += text.matches('\n').count() as u32;
                self.generated.column = (text.len() - last - 1) as u32;
            }
            None => self.generated.column += text.len() as u32,
        }
    }

    fn enter(&mut self, info: Option<&SourceInfo>) {
        self.groups.push(info.map(|info| OriginalPosition {
            source: info.source.clone(),
            line: info.line,
            column: info.column.saturating_sub(1),
        }));
    }

    fn leave(&mut self) {
        self.groups.pop();
    }
}
