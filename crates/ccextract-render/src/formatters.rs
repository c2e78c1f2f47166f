use ccextract_types::MessageMetadata;

/// `1234567` -> `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Milliseconds as `{m}m {s}s`, seconds rounded
pub fn format_duration_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) as f64 / 1000.0;
    format!("{}m {:.0}s", minutes, seconds)
}

/// Size in kilobytes with one decimal
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Pieces of the per-reply metadata line
pub fn metadata_parts(metadata: &MessageMetadata) -> Vec<String> {
    let mut parts = Vec::with_capacity(3);
    if !metadata.model.is_empty() {
        parts.push(format!("model: {}", metadata.model));
    }
    parts.push(format!(
        "tokens: {}→{}",
        format_number(metadata.input_tokens),
        format_number(metadata.output_tokens)
    ));
    if metadata.cache_read_tokens > 0 {
        parts.push(format!(
            "cache read: {}",
            format_number(metadata.cache_read_tokens)
        ));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(5400), "0m 5s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
        assert_eq!(format_duration_ms(60_000), "1m 0s");
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(0), "0.0 KB");
        assert_eq!(format_kb(2048), "2.0 KB");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;"
        );
    }

    #[test]
    fn test_metadata_parts() {
        let metadata = MessageMetadata {
            model: "claude-opus-4-1".into(),
            input_tokens: 1000,
            output_tokens: 200,
            cache_read_tokens: 5000,
            ..Default::default()
        };
        assert_eq!(
            metadata_parts(&metadata).join(" | "),
            "model: claude-opus-4-1 | tokens: 1,000→200 | cache read: 5,000"
        );

        let bare = MessageMetadata::default();
        assert_eq!(metadata_parts(&bare), vec!["tokens: 0→0"]);
    }
}
