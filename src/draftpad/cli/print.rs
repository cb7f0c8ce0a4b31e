use chrono::{DateTime, Utc};
use colored::Colorize;
use draftpad::api::{CmdMessage, MessageLevel};
use draftpad::index::DisplayDocument;
use draftpad::model::AutosaveRecord;
use draftpad::render::{PreviewContent, Rendered};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_full_document(dp: &DisplayDocument) {
    println!(
        "{} {}",
        dp.index.to_string().yellow(),
        dp.document.title.bold()
    );
    println!("--------------------------------");
    println!("{}", dp.document.content);
}

pub(super) fn print_documents(docs: &[DisplayDocument]) {
    if docs.is_empty() {
        println!("No documents found.");
        return;
    }

    let idx_width = docs.len().to_string().len() + 2;
    for dp in docs {
        let idx_str = format!("{:>width$} ", format!("{}.", dp.index), width = idx_width);
        let time_ago = format_time_ago(dp.document.updated_at);

        let content_preview: String = dp
            .document
            .content
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let title = &dp.document.title;

        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH + 2);
        let title_display = truncate_to_width(title, available);
        let remaining = available.saturating_sub(title_display.width() + 1);
        let preview_display = truncate_to_width(content_preview.trim(), remaining);
        let padding =
            available.saturating_sub(title_display.width() + 1 + preview_display.width());

        println!(
            "  {}{} {}{}{}",
            idx_str,
            title_display,
            preview_display.dimmed(),
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_autosave(record: &AutosaveRecord) {
    println!(
        "{}",
        format!("Autosaved {}", format_time_ago(record.saved_at).trim()).dimmed()
    );
    println!("--------------------------------");
    println!("{}", record.content);
}

pub(super) fn print_rendered(rendered: &Rendered) {
    print!("{}", rendered.html);
}

pub(super) fn print_preview(content: &PreviewContent) {
    match content {
        PreviewContent::Empty => println!("{}", "(nothing rendered yet)".dimmed()),
        PreviewContent::Rendered(rendered) => {
            print_rendered(rendered);
            println!("{}", format!("{} words", rendered.word_count).dimmed());
        }
        PreviewContent::Failed(err) => println!("{}", err.red()),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // wide characters count double
        assert_eq!(truncate_to_width("日本語テキスト", 6), "日本…");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let formatted = format_time_ago(Utc::now());
        assert_eq!(formatted.width(), TIME_WIDTH);
    }
}
