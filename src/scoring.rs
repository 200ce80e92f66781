use std::time::Duration;

/// Characters per "word" in the conventional wpm formula
pub const CHARS_PER_WORD: f64 = 5.0;

/// Leading run of `input` that matches `target`, compared char by char.
pub fn longest_common_prefix<'a>(target: &str, input: &'a str) -> &'a str {
    let end = target
        .chars()
        .zip(input.char_indices())
        .take_while(|(t, (_, c))| t == c)
        .last()
        .map(|(_, (i, c))| i + c.len_utf8())
        .unwrap_or(0);
    &input[..end]
}

/// Progress through the target in percent, rounded up to one decimal.
pub fn progress_percent(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((matched as f64 / total as f64) * 1000.0).ceil() / 10.0
}

/// Progress as displayed, e.g. `"33.4%"` or `"100%"`
pub fn format_progress(matched: usize, total: usize) -> String {
    format!("{}%", progress_percent(matched, total))
}

// https://www.speedtypingonline.com/typing-equations
pub fn net_wpm(key_count: usize, error_count: usize, elapsed: Duration) -> f64 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    let net = key_count.saturating_sub(error_count) as f64;
    ceil_to(net / CHARS_PER_WORD / minutes, 2)
}

pub fn ceil_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).ceil() / scale
}
