use serde::Serialize;

const MAX_DESC_DISPLAY: usize = 64;

/// One selectable commit-type or commit-scope entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub code: String,
    pub label: String,
    pub desc: String,
}

impl CatalogItem {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            desc: desc.into(),
        }
    }

    pub fn display_line(&self) -> String {
        if !self.code.is_empty() && !self.desc.is_empty() {
            format!("{}: {}", self.code, truncate_desc(&self.desc))
        } else {
            self.code.clone()
        }
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.label.to_lowercase().contains(&needle) || self.desc.to_lowercase().contains(&needle)
    }
}

pub fn to_display_strings<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    items.into_iter().map(CatalogItem::display_line).collect()
}

fn truncate_desc(desc: &str) -> String {
    if desc.chars().count() <= MAX_DESC_DISPLAY {
        return desc.to_string();
    }
    let head = desc
        .chars()
        .take(MAX_DESC_DISPLAY - 3)
        .collect::<String>();
    format!("{head}...")
}

/// Builds the canonical commit message from its parts.
///
/// A component's punctuation is emitted only when the component itself is
/// non-empty: no empty parentheses, no dangling colon. An empty title
/// yields `type(scope)`.
pub fn assemble_message(type_code: &str, scope_code: &str, title: &str) -> String {
    let mut message = String::new();
    if !type_code.is_empty() {
        message.push_str(type_code);
    }
    if !scope_code.is_empty() {
        if message.is_empty() {
            message.push_str(scope_code);
        } else {
            message.push('(');
            message.push_str(scope_code);
            message.push(')');
        }
    }
    if !title.is_empty() {
        if message.is_empty() {
            message.push_str(title);
        } else {
            message.push_str(": ");
            message.push_str(title);
        }
    }
    message
}
