//! File naming for generated documents.

use chrono::{DateTime, SecondsFormat, Utc};

const REPORT_PREFIX: &str = "parte_respuesta_alarma_";

/// Prefix of report files still being written. Listings never show them.
pub(crate) const PARTIAL_PREFIX: &str = ".parte_en_curso_";
pub(crate) const PARTIAL_SUFFIX: &str = ".part";

/// Name for a report PDF generated at `at`.
///
/// The ISO-8601 UTC timestamp (millisecond precision) has `:` and `.` replaced by `-`, for
/// example `parte_respuesta_alarma_2026-10-19T08-15-30-123Z.pdf`.
pub fn report_file_name(at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}{}.pdf", REPORT_PREFIX, timestamp)
}

/// `name` with `-<n>` before its extension, used when the plain name is already taken.
pub fn numbered_file_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, n, ext),
        _ => format!("{}-{}", name, n),
    }
}

pub(crate) fn is_partial(name: &str) -> bool {
    name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX)
}
