//! Count-and-noun formatting for log lines.

/// `"1 file"`, `"0 files"`, `"12 files"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
