use articlechat_core::params::{ParamField, RequestParams};
use articlechat_core::text::looks_like_email;
use articlechat_core::transcript::TranscriptEntry;
use chrono::{Local, TimeZone};

pub fn local_time(unix_ms: i64) -> String {
    Local
        .timestamp_millis_opt(unix_ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into())
}

pub fn format_entry(entry: &TranscriptEntry) -> String {
    format!(
        "you> {}\nbot> {}\n     [{}]",
        entry.question,
        entry.answer.replace('\n', "\n     "),
        local_time(entry.completed_at_unix_ms)
    )
}

pub fn format_params(params: &RequestParams, in_flight: bool) -> String {
    let mut out = String::new();
    for field in ParamField::ALL {
        let value = params.get(field);
        let shown = if value.is_empty() { "(empty)" } else { value };
        out.push_str(&format!("{:>9}: {}", field.label(), shown));
        if field == ParamField::UserEmail && !value.is_empty() && !looks_like_email(value) {
            out.push_str("  (doesn't look like an email; sent as-is)");
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{:>9}: {}",
        "state",
        if in_flight { "waiting for answer" } else { "idle" }
    ));
    out
}
