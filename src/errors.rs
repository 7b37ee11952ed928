//! Classification of uncaught errors and the fatal error screen.
//!
//! Browser extensions that inject wallet providers throw into every page they
//! touch. Those messages are matched against a denylist and suppressed; any
//! other uncaught error replaces the app with an error screen that points the
//! user at the reset control. A Rust panic always ends the app, so it always
//! gets the error screen whatever its message says.

use std::any::Any;

use crate::catalog::BOOKS;
use crate::config::{COVER_KEY_PREFIX, KEY_FREE_DRAWS, KEY_LOGS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Unrelated noise: swallow it and leave the UI alone.
    Suppressed,
    /// A real failure: show the error screen.
    Fatal,
}

/// Lower-case substrings of messages that never come from this app.
const SUPPRESSED_PATTERNS: &[&str] = &["metamask", "ethereum"];

pub fn classify(message: &str) -> Disposition {
    let lower = message.to_lowercase();
    if SUPPRESSED_PATTERNS.iter().any(|p| lower.contains(p)) {
        Disposition::Suppressed
    } else {
        Disposition::Fatal
    }
}

/// Text of a panic payload (`panic!` produces `&str` or `String`).
pub fn payload_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

pub const FATAL_TITLE: &str = "エラーが発生しました";
pub const FATAL_HINT: &str = "画面下の「データをリセット」をお試しください。";

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline handler for the fatal screen's reset button. The app is gone at
/// that point, so storage is cleared directly before reloading.
fn reset_script() -> String {
    let mut keys = vec![KEY_LOGS.to_string(), KEY_FREE_DRAWS.to_string()];
    keys.extend(BOOKS.iter().map(|b| format!("{COVER_KEY_PREFIX}{}", b.id)));
    let removes: String = keys
        .iter()
        .map(|k| format!("localStorage.removeItem('{k}');"))
        .collect();
    format!("try{{{removes}}}catch(e){{}}location.reload();")
}

/// Markup that replaces the page body when a fatal error escapes.
pub fn fatal_screen_html(message: &str) -> String {
    format!(
        concat!(
            r#"<div style="padding:16px;font-size:14px;font-family:sans-serif">"#,
            r#"<div style="margin-bottom:8px;font-weight:600">{}</div>"#,
            r#"<div style="margin-bottom:12px;white-space:pre-wrap;word-break:break-all">{}</div>"#,
            r#"<div style="font-size:12px;opacity:0.7">{}</div>"#,
            r#"<button style="margin-top:16px;padding:8px 12px" onclick="{}">データをリセット</button>"#,
            r#"</div>"#
        ),
        FATAL_TITLE,
        escape_html(message),
        FATAL_HINT,
        escape_html(&reset_script()),
    )
}

/// Error screen for a panic. `fallback` is used when the payload is not text.
pub fn panic_screen_html(payload: &(dyn Any + Send), fallback: &str) -> String {
    let message = payload_message(payload).unwrap_or_else(|| fallback.to_string());
    fatal_screen_html(&message)
}
