//! # Domain Model: Documents and Derived Titles
//!
//! This module defines the records draftpad persists: [`Document`] for
//! user-named saves and [`AutosaveRecord`] for the single crash-recovery slot.
//!
//! ## Titles
//!
//! Users rarely name a draft before they start typing, and the confirm dialog
//! needs to save the buffer without asking for a name. So a title can always be
//! derived from the content itself:
//!
//! ```text
//! # Release notes        <-- first heading wins (ATX or setext)
//! Some body text
//! ```
//!
//! 1. **Heading**: the text of the first markdown heading.
//! 2. **First line**: otherwise the first non-blank line, leading `#` stripped.
//! 3. **Fallback**: otherwise the configured fallback label.
//!
//! Derived titles are truncated to 60 characters (59 + `…`) so lists stay
//! readable. Titles given explicitly by the user are stored as typed.

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_FALLBACK_TITLE: &str = "Untitled Document";
const MAX_TITLE_CHARS: usize = 60;

/// Stable identifier assigned by the store on first save.
pub type DocumentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The single overwritable autosave slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveRecord {
    pub content: String,
    pub saved_at: DateTime<Utc>,
}

/// Derives a document title from its content.
///
/// See the module docs for the precedence rules.
pub fn derive_title(content: &str, fallback: &str) -> String {
    let title = first_heading(content)
        .or_else(|| first_line(content))
        .unwrap_or_else(|| fallback.to_string());
    truncate_title(&title)
}

fn first_heading(content: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
                in_heading = false;
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_heading => text.push(' '),
            _ => {}
        }
    }

    None
}

fn first_line(content: &str) -> Option<String> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let truncated: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
        format!("{}…", truncated)
    } else {
        title.to_string()
    }
}
