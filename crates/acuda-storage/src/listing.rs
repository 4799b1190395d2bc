//! Filtering, ordering and pagination of folder listings.

use acuda_core::models::{FilePage, FileQuery, StoredFileEntry};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PAGE_SIZE: usize = 10;

/// Parse the leading decimal digits of `raw`; absent, non-numeric or zero gives `default`.
///
/// `"2abc"` parses as 2, `"abc"` and `"-1"` fall back.
pub fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();

    match digits.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => default,
    }
}

/// Build a [`FileQuery`] from raw query-string values.
pub fn file_query(pagina: Option<&str>, limite: Option<&str>, busqueda: Option<&str>) -> FileQuery {
    FileQuery {
        page: parse_positive(pagina, DEFAULT_PAGE),
        page_size: parse_positive(limite, DEFAULT_PAGE_SIZE),
        search: busqueda.unwrap_or_default().to_string(),
    }
}

/// Case-insensitive substring match; an empty search matches everything.
pub fn matches_search(name: &str, search: &str) -> bool {
    search.is_empty() || name.to_lowercase().contains(&search.to_lowercase())
}

/// Newest first. The sort is stable, so equal timestamps keep directory order.
pub fn sort_newest_first(entries: &mut [StoredFileEntry]) {
    entries.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion));
}

/// Slice one page out of the sorted entries.
pub fn paginate(entries: Vec<StoredFileEntry>, query: &FileQuery) -> FilePage {
    let page_size = query.page_size.max(1);
    let total = entries.len();
    let total_paginas = total.div_ceil(page_size);
    let start = query.page.saturating_sub(1).saturating_mul(page_size);

    let documentos = entries
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    FilePage {
        documentos,
        total,
        pagina: query.page,
        total_paginas,
    }
}
