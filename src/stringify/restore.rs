use tracing::debug;

use super::Builder;
use crate::placeholder::{ExpressionTable, PlaceholderPattern};

/// A [`Builder`] that puts interpolations back.
///
/// Every chunk is scanned for placeholder comments; each one whose table
/// entry is intact is replaced by the original `${...}` text. Without a
/// table, or for cleared entries, the placeholder stays as written.
pub struct Restorer<'t, B: Builder> {
    inner: B,
    table: Option<(&'t ExpressionTable, PlaceholderPattern)>,
    restored: usize,
    unresolved: usize,
}

impl<'t, B: Builder> Restorer<'t, B> {
    pub fn new(inner: B, table: Option<&'t ExpressionTable>) -> Self {
        if table.is_none() {
            debug!("no expression table, placeholders are written as-is");
        }
        Self {
            inner,
            table: table.map(|t| (t, t.pattern())),
            restored: 0,
            unresolved: 0,
        }
    }

    /// Placeholders replaced so far.
    pub fn restored(&self) -> usize {
        self.restored
    }

    /// Placeholders left in the output because their entry was gone.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    pub fn finish(self) -> B {
        if self.unresolved > 0 {
            debug!(
                restored = self.restored,
                unresolved = self.unresolved,
                "placeholders left unresolved"
            );
        }
        self.inner
    }
}

impl<B: Builder> Builder for Restorer<'_, B> {
    fn append(&mut self, chunk: &str) {
        let Some((table, pattern)) = &self.table else {
            self.inner.append(chunk);
            return;
        };
        if !pattern.is_match(chunk) {
            self.inner.append(chunk);
            return;
        }

        let restored = &mut self.restored;
        let unresolved = &mut self.unresolved;
        let text = pattern.replace_all(chunk, |index| match table.resolve(index) {
            Some(source) => {
                *restored += 1;
                Some(source)
            }
            None => {
                *unresolved += 1;
                None
            }
        });
        self.inner.append(&text);
    }
}
