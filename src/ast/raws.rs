/// Formatting metadata a node keeps so it can be written back exactly.
///
/// Fields are optional so that freshly constructed nodes can fall back to
/// stringifier defaults. Which fields apply depends on the node:
///
/// | field        | used by                                                   |
/// |--------------|-----------------------------------------------------------|
/// | `before`     | every child node: text before it (whitespace, stray `;`)  |
/// | `after`      | root, rule, at-rule with block: text before the `}`/EOF   |
/// | `between`    | rule/at-rule: before `{`; declaration: around the `:`     |
/// | `semicolon`  | containers: last child was terminated by `;`              |
/// | `after_name` | at-rule: between the name and its params                  |
/// | `left`/`right` | comment: whitespace inside `/*` and `*/`                |
/// | `important`  | declaration: raw `!important` text                        |
/// | `value`      | declaration: raw value when it differs from the clean one |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    pub before: Option<String>,
    pub after: Option<String>,
    pub between: Option<String>,
    pub semicolon: bool,
    pub after_name: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub important: Option<String>,
    pub value: Option<RawValue>,
}

/// A cleaned value together with the exact text it came from.
///
/// The raw text is only used while the node's value still equals `value`;
/// once the value is edited the raw form is stale and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub raw: String,
}

impl RawValue {
    pub fn new(value: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: raw.into(),
        }
    }

    /// `raw` if it still describes `current`, otherwise `current`.
    pub fn resolve<'a>(this: Option<&'a RawValue>, current: &'a str) -> &'a str {
        match this {
            Some(raw) if raw.value == current => &raw.raw,
            _ => current,
        }
    }
}
