//! Commands behind the `rich-value` binary
//!
//! Every command takes the input text and the loaded configuration and returns
//! the text to print, so the binary only deals with files, flags and exit codes.

use markup5ever_rcdom::Handle;
use rich_value::wire::{from_json, to_json};
use rich_value::{to_markup, BuildOptions, Builder, HtmlFragment, Selection, Value, ValueError};
use rich_value_config::RichValueConfig;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Invalid boundary '{raw}': {reason}")]
    InvalidBoundary { raw: String, reason: String },
    #[error("No node at path '{0}'")]
    NodeNotFound(String),
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A selection end given on the command line as `PATH:OFFSET`.
///
/// PATH is a dot-separated list of child indices from the fragment root,
/// empty for the root itself: `0.1:3` is offset 3 in the second child of the
/// first top-level node, `:0` is the start of the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySpec {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl FromStr for BoundarySpec {
    type Err = CommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CommandError::InvalidBoundary {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let (path, offset) = raw
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected PATH:OFFSET"))?;
        let offset = offset
            .parse()
            .map_err(|_| invalid("offset is not a number"))?;
        let path = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.')
                .map(|index| index.parse())
                .collect::<Result<Vec<usize>, _>>()
                .map_err(|_| invalid("path must be dot-separated child indices"))?
        };
        Ok(Self { path, offset })
    }
}

impl BoundarySpec {
    fn resolve(&self, fragment: &HtmlFragment) -> Result<(Handle, usize), CommandError> {
        let node = fragment.node_at_path(&self.path).ok_or_else(|| {
            let path: Vec<String> = self.path.iter().map(usize::to_string).collect();
            CommandError::NodeNotFound(path.join("."))
        })?;
        Ok((node, self.offset))
    }
}

fn build(
    fragment: &HtmlFragment,
    config: &RichValueConfig,
    selection: Option<Selection<Handle>>,
) -> Value {
    Builder::new()
        .with_options(BuildOptions::from(&config.build))
        .with_filters(config.filters.to_filters())
        .with_selection(selection)
        .build(fragment.root())
}

/// Markup to the JSON form of its value.
///
/// With only one of `start` and `end`, the selection is collapsed there.
pub fn create(
    markup: &str,
    config: &RichValueConfig,
    start: Option<&BoundarySpec>,
    end: Option<&BoundarySpec>,
) -> Result<String, CommandError> {
    let fragment = HtmlFragment::parse(markup);

    let selection = match (start.or(end), end.or(start)) {
        (Some(start), Some(end)) => {
            let (start_node, start_offset) = start.resolve(&fragment)?;
            let (end_node, end_offset) = end.resolve(&fragment)?;
            Some(Selection::new(
                rich_value::Boundary::new(start_node, start_offset),
                rich_value::Boundary::new(end_node, end_offset),
            ))
        }
        _ => None,
    };

    let value = build(&fragment, config, selection);
    log::debug!(
        "built {} units with {} formats",
        value.len(),
        value.table.len()
    );
    Ok(to_json(&value, config.output.pretty)?)
}

/// JSON value to markup.
pub fn serialize(json: &str, config: &RichValueConfig) -> Result<String, CommandError> {
    let value = from_json(json)?;
    Ok(to_markup(&value, config.serialize_line_tag())?)
}

/// Markup through a value and back to markup.
pub fn roundtrip(markup: &str, config: &RichValueConfig) -> Result<String, CommandError> {
    let fragment = HtmlFragment::parse(markup);
    let value = build(&fragment, config, None);
    Ok(to_markup(&value, config.serialize_line_tag())?)
}
