//! JSON form of a value
//!
//! Handles do not survive serialization: every slot is written out as the
//! list of descriptors it refers to. On load, identity is re-established by
//! sharing a descriptor with the previous character whenever it is equal and
//! sits at the same depth under the same ancestors. Two adjacent runs that
//! were distinct but equal therefore come back as one run.
//!
//! ```json
//! {"text":"test","formats":[[{"type":"em"}],[{"type":"em"}],[{"type":"em"}],[{"type":"em"}]],"start":0,"end":4}
//! ```

use crate::error::ValueError;
use crate::format::FormatDescriptor;
use crate::stack::FormatTracker;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDocument {
    pub text: String,
    pub formats: Vec<Vec<FormatDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl From<&Value> for ValueDocument {
    fn from(value: &Value) -> Self {
        let formats = value
            .formats
            .iter()
            .map(|slot| {
                slot.iter()
                    .filter_map(|handle| value.table.get(*handle).cloned())
                    .collect()
            })
            .collect();
        Self {
            text: value.text_string(),
            formats,
            start: value.start,
            end: value.end,
        }
    }
}

impl ValueDocument {
    /// Rebuild a value, checking that formats run parallel to the UTF-16 text
    /// and that the selection lies inside it.
    pub fn into_value(self) -> Result<Value, ValueError> {
        let text: Vec<u16> = self.text.encode_utf16().collect();
        if text.len() != self.formats.len() {
            return Err(ValueError::InvalidValueShape {
                text: text.len(),
                formats: self.formats.len(),
            });
        }
        for offset in [self.start, self.end].into_iter().flatten() {
            if offset > text.len() {
                return Err(ValueError::WireError(format!(
                    "selection offset {offset} is past the end of a {} unit text",
                    text.len()
                )));
            }
        }

        let mut tracker = FormatTracker::new().coalescing(true);
        let mut formats = Vec::with_capacity(self.formats.len());
        for slot in self.formats {
            while tracker.close().is_some() {}
            let previous = formats.last().map(Vec::as_slice);
            for descriptor in slot {
                tracker.open(descriptor, previous);
            }
            formats.push(tracker.snapshot());
        }

        Ok(Value {
            text,
            formats,
            start: self.start,
            end: self.end,
            table: tracker.into_table(),
        })
    }
}

pub fn to_json(value: &Value, pretty: bool) -> Result<String, ValueError> {
    let document = ValueDocument::from(value);
    let json = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    json.map_err(|e| ValueError::WireError(e.to_string()))
}

pub fn from_json(json: &str) -> Result<Value, ValueError> {
    let document: ValueDocument =
        serde_json::from_str(json).map_err(|e| ValueError::WireError(e.to_string()))?;
    document.into_value()
}
