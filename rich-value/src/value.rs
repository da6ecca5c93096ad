//! The flat rich text value
//!
//! A [`Value`] is a UTF-16 text plus one format slot per code unit. Each slot
//! lists the handles of the descriptors enclosing that unit, outermost first;
//! an empty slot means unformatted text. The optional `start`/`end` offsets
//! describe a selection in the same linear coordinates.
//!
//! Values are rebuilt from a tree snapshot, or derived from another value by
//! [`Value::slice`] and [`Value::append`]. They are never patched in place to
//! follow a live tree.

use crate::error::ValueError;
use crate::format::{FormatDescriptor, FormatHandle, FormatTable};
use std::ops::Range;

/// Stands in for an embedded object in the text.
pub const OBJECT_REPLACEMENT_CHARACTER: char = '\u{fffc}';

/// Invisible padding character used by editors to keep empty inlines alive.
pub const ZWNBSP: char = '\u{feff}';

/// A line-break element, as stored in the text.
pub const LINE_BREAK: u16 = b'\n' as u16;

/// Separator between two lines of a multiline value.
pub const PARAGRAPH_SEPARATOR: [u16; 2] = [LINE_BREAK, LINE_BREAK];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub text: Vec<u16>,
    pub formats: Vec<Vec<FormatHandle>>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub table: FormatTable,
}

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unformatted value holding `text` verbatim.
    pub fn from_text(text: &str) -> Self {
        let text: Vec<u16> = text.encode_utf16().collect();
        let formats = vec![Vec::new(); text.len()];
        Self {
            text,
            formats,
            ..Self::default()
        }
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text_string(&self) -> String {
        String::from_utf16_lossy(&self.text)
    }

    pub fn descriptor(&self, handle: FormatHandle) -> Option<&FormatDescriptor> {
        self.table.get(handle)
    }

    /// Descriptors enclosing the unit at `index`, outermost first.
    pub fn stack_at(&self, index: usize) -> Vec<&FormatDescriptor> {
        self.formats
            .get(index)
            .map(|slot| slot.iter().filter_map(|h| self.table.get(*h)).collect())
            .unwrap_or_default()
    }

    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Verify that formats run parallel to the text and only reference owned
    /// descriptors.
    pub fn check_shape(&self) -> Result<(), ValueError> {
        if self.formats.len() != self.text.len() {
            return Err(ValueError::InvalidValueShape {
                text: self.text.len(),
                formats: self.formats.len(),
            });
        }
        for (index, slot) in self.formats.iter().enumerate() {
            if let Some(handle) = slot.iter().find(|h| !self.table.contains(**h)) {
                return Err(ValueError::UnknownFormat {
                    index,
                    handle: handle.index(),
                });
            }
        }
        Ok(())
    }

    /// Same text and same descriptor values in every slot.
    ///
    /// Handles are not compared, so two values built from the same markup by
    /// separate walks are structurally equal.
    pub fn structurally_eq(&self, other: &Value) -> bool {
        self.text == other.text
            && self.formats.len() == other.formats.len()
            && (0..self.formats.len()).all(|index| {
                self.formats[index].len() == other.formats[index].len()
                    && self.stack_at(index) == other.stack_at(index)
            })
    }

    /// Append another value, importing its descriptors into this table.
    ///
    /// Identity is preserved inside the appended part; nothing is merged
    /// across the seam.
    pub fn append(&mut self, other: &Value) {
        let mut remap = HandleMap::new(&other.table);
        self.import(other, 0..other.len(), &mut remap);
    }

    /// Concatenate values in order.
    pub fn concat<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
        let mut result = Value::new();
        for value in values {
            result.append(value);
        }
        result
    }

    /// Copy of the units in `start..end` with only the descriptors they use.
    ///
    /// The range is clamped to the value. A selection is kept, clamped and
    /// shifted into the slice.
    pub fn slice(&self, start: usize, end: usize) -> Value {
        let end = end.min(self.len());
        let start = start.min(end);
        let mut sliced = Value::new();
        let mut remap = HandleMap::new(&self.table);
        sliced.import(self, start..end, &mut remap);
        sliced.start = self.start.map(|s| s.clamp(start, end) - start);
        sliced.end = self.end.map(|e| e.clamp(start, end) - start);
        sliced
    }

    fn import(&mut self, source: &Value, range: Range<usize>, remap: &mut HandleMap<'_>) {
        for index in range {
            let Some(unit) = source.text.get(index) else {
                break;
            };
            let slot = source
                .formats
                .get(index)
                .map(|slot| {
                    slot.iter()
                        .filter_map(|handle| remap.resolve(*handle, &mut self.table))
                        .collect()
                })
                .unwrap_or_default();
            self.text.push(*unit);
            self.formats.push(slot);
        }
    }
}

/// Lazily copies descriptors from one table into another, keeping identity.
struct HandleMap<'a> {
    source: &'a FormatTable,
    mapped: Vec<Option<FormatHandle>>,
}

impl<'a> HandleMap<'a> {
    fn new(source: &'a FormatTable) -> Self {
        Self {
            source,
            mapped: vec![None; source.len()],
        }
    }

    fn resolve(&mut self, handle: FormatHandle, target: &mut FormatTable) -> Option<FormatHandle> {
        let source = self.source;
        let descriptor = source.get(handle)?;
        let slot = &mut self.mapped[handle.index()];
        Some(*slot.get_or_insert_with(|| target.insert(descriptor.clone())))
    }
}
