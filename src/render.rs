//! Plain-text rendering of the notification table and config set.
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

use crate::config_modal::ConfigSet;
use crate::model::{NotificationRecord, NotificationStatus, Timestamp};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

const CONTENT_WIDTH: usize = 40;

/// Strip markup from rich text and collapse whitespace.
pub fn plain_text(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    SPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Cut to `max` characters, marking the cut with an ellipsis.
pub fn ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn status_label(status: NotificationStatus) -> &'static str {
    match status {
        NotificationStatus::Online => "正常",
        NotificationStatus::Offline => "异常",
        NotificationStatus::Other(0) => "异常",
        NotificationStatus::Other(_) => "正常",
    }
}

fn cells(record: &NotificationRecord) -> [String; 7] {
    let time = |t: &Option<Timestamp>| {
        t.as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".into())
    };
    [
        record.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
        record.title.clone(),
        record.sort.to_string(),
        ellipsis(&plain_text(&record.content), CONTENT_WIDTH),
        status_label(record.status).to_string(),
        time(&record.create_time),
        time(&record.update_time),
    ]
}

/// Tab-separated table with the admin page's columns and a total line.
pub fn render_table(rows: &[NotificationRecord], total: u64) -> String {
    let mut out = String::new();
    out.push_str("ID\t标题\t排序\t内容\t状态值\t创建时间\t更新时间\n");
    for row in rows {
        out.push_str(&cells(row).join("\t"));
        out.push('\n');
    }
    let _ = writeln!(out, "total: {}", total);
    out
}

pub fn render_configs(configs: &ConfigSet) -> String {
    let mut out = String::new();
    for entry in configs.entries() {
        let value = entry.value.as_deref().map(plain_text).unwrap_or_default();
        let _ = writeln!(out, "{}\t{}", entry.name, ellipsis(&value, 60));
    }
    out
}
