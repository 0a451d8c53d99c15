//! Pure markdown escaping utilities.
//!
//! [`escape_markdown`] runs over raw text (never over code) and applies an
//! ordered list of substitutions. Line-anchored patterns are evaluated per
//! line. The pass is deliberately conservative: ambiguous text is escaped.
//!
//! The fence and tick helpers size code delimiters so they cannot collide
//! with the content they wrap.

use std::sync::LazyLock;

use regex_lite::Regex;

struct Escape {
    pattern: Regex,
    replacement: &'static str,
}

static ESCAPES: LazyLock<Vec<Escape>> = LazyLock::new(|| {
    [
        (r"\\", r"\\"),
        (r"\*", r"\*"),
        (r"_", r"\_"),
        (r"(?m)^-", r"\-"),
        (r"(?m)^\+ ", r"\+ "),
        (r"(?m)^(=+)", r"\${1}"),
        (r"(?m)^(#{1,6}) ", r"\${1} "),
        (r"`", r"\`"),
        (r"(?m)^~~~", r"\~~~"),
        (r"\[", r"\["),
        (r"\]", r"\]"),
        (r"<([^<>]*)>", r"\<${1}\>"),
        (r"(?m)^>", r"\>"),
        (r"(?m)^(\d+)\. ", r"${1}\. "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| Escape {
        pattern: Regex::new(pattern).expect("escape pattern is valid"),
        replacement,
    })
    .collect()
});

/// Escape special Markdown characters in text.
///
/// Substitutions run in a fixed order: backslash, `*`, `_`, a leading `-`,
/// a leading `+ `, a leading run of `=`, a leading ATX heading marker,
/// backtick, a leading `~~~`, `[`, `]`, angle-bracketed spans, a leading `>`
/// and a leading ordered-list number.
///
/// # Examples
///
/// ```
/// use turndown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("[link]"), "\\[link\\]");
/// assert_eq!(escape_markdown("1. first"), "1\\. first");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = text.to_string();
    for escape in ESCAPES.iter() {
        if escape.pattern.is_match(&result) {
            result = escape
                .pattern
                .replace_all(&result, escape.replacement)
                .into_owned();
        }
    }
    result
}

/// Calculate the fence length needed for a fenced code block.
///
/// Only runs of the fence character at the start of a line can close a
/// fence, so the result is one more than the longest such run, and at
/// least 3.
///
/// # Examples
///
/// ```
/// use turndown::calculate_fence_length;
///
/// assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
/// assert_eq!(calculate_fence_length("```rust\ncode\n```", '`'), 4);
/// // Runs in the middle of a line do not count
/// assert_eq!(calculate_fence_length("a ````` b", '`'), 3);
/// ```
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    let longest = content
        .lines()
        .map(|line| line.chars().take_while(|&c| c == fence_char).count())
        .max()
        .unwrap_or(0);

    (longest + 1).max(3)
}

/// Calculate the minimum backtick count needed for inline code.
///
/// Returns one more than the longest contiguous backtick run.
///
/// # Examples
///
/// ```
/// use turndown::calculate_inline_code_ticks;
///
/// assert_eq!(calculate_inline_code_ticks("code"), 1);
/// assert_eq!(calculate_inline_code_ticks("code with ` backtick"), 2);
/// ```
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run + 1
}
