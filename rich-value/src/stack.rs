//! Format stack tracking
//!
//! The tracker owns the descriptor table of the value under construction and
//! the list of descriptors currently open, outermost first. An element opens
//! exactly one descriptor for its whole lifetime, so every character emitted
//! while it is open shares the same handle at the same depth.

use crate::format::{FormatDescriptor, FormatHandle, FormatTable};

#[derive(Debug, Default)]
pub struct FormatTracker {
    table: FormatTable,
    open: Vec<FormatHandle>,
    coalesce: bool,
}

impl FormatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse the previous character's descriptor when an equal one opens right
    /// after it, at the same depth and under the same ancestors.
    pub fn coalescing(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    /// Open a descriptor on top of the stack.
    ///
    /// `previous` is the stack of the last emitted character, used only when
    /// coalescing. Object descriptors are never shared.
    pub fn open(
        &mut self,
        descriptor: FormatDescriptor,
        previous: Option<&[FormatHandle]>,
    ) -> FormatHandle {
        let handle = match self.reusable(&descriptor, previous) {
            Some(handle) => handle,
            None => self.table.insert(descriptor),
        };
        self.open.push(handle);
        handle
    }

    fn reusable(
        &self,
        descriptor: &FormatDescriptor,
        previous: Option<&[FormatHandle]>,
    ) -> Option<FormatHandle> {
        if !self.coalesce || descriptor.object {
            return None;
        }
        let previous = previous?;
        let depth = self.open.len();
        let candidate = *previous.get(depth)?;
        if previous[..depth] != self.open[..] {
            return None;
        }
        match self.table.get(candidate) {
            Some(existing) if existing == descriptor && !existing.object => Some(candidate),
            _ => None,
        }
    }

    pub fn close(&mut self) -> Option<FormatHandle> {
        self.open.pop()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn open_handles(&self) -> &[FormatHandle] {
        &self.open
    }

    /// Copy of the open stack, as stored in a character's format slot.
    pub fn snapshot(&self) -> Vec<FormatHandle> {
        self.open.clone()
    }

    pub fn table(&self) -> &FormatTable {
        &self.table
    }

    pub fn into_table(self) -> FormatTable {
        self.table
    }
}
