//! Greedy word wrap over the bundled font metrics.

use crate::layout::font_metrics::FontMetrics;

/// Wraps `text` to lines no wider than `max_width_pt` at `size_pt`.
///
/// Words are separated by any whitespace run. A single word wider than the
/// line is broken between characters (long e-mail addresses and URLs).
/// Empty or whitespace-only text yields no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetrics,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let max_em = (max_width_pt / size_pt).max(0.0);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_str(word);

        if word_w > max_em {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for piece in break_word(word, metrics, max_em) {
                current_width = metrics.measure_str(&piece);
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
            }
            continue;
        }

        let space_w = if current.is_empty() {
            0.0
        } else {
            metrics.space_width
        };

        if !current.is_empty() && current_width + space_w + word_w > max_em {
            // Current line is full: push it and start a new one with this word.
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits an over-long word into pieces that each fit `max_em`.
/// Every piece holds at least one character so the loop always advances.
fn break_word(word: &str, metrics: &FontMetrics, max_em: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let w = metrics.char_width(c);
        if !piece.is_empty() && width + w > max_em {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFamily};

    fn metrics() -> &'static FontMetrics {
        get_metrics(FontFamily::Sans)
    }

    #[test]
    fn test_wrap_empty_returns_no_lines() {
        assert!(wrap_text("   ", metrics(), 10.0, 200.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = wrap_text("Built  responsive UI", metrics(), 10.0, 400.0);
        assert_eq!(lines, vec!["Built responsive UI"]);
    }

    #[test]
    fn test_wrap_long_text_respects_width() {
        let text = "Integrated APIs and optimized performance for key pages across the product";
        let lines = wrap_text(text, metrics(), 10.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics().width_pt(line, 10.0) <= 120.0 + 1e-3, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let word = "averyveryverylongaddress@example-domain.com";
        let lines = wrap_text(word, metrics(), 10.0, 60.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_word_after_broken_word_joins_tail_piece() {
        // 24 x's at 0.532em break into 9 + 9 + 6; "ok" still fits after the tail.
        let lines = wrap_text("xxxxxxxxxxxxxxxxxxxxxxxx ok", metrics(), 10.0, 50.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "xxxxxx ok");
    }
}
