use crate::command::{ResponseMeta, ScanOutput, SearchOutput};

/// Plain-text rendering of a search page.
pub fn render_search(out: &SearchOutput, meta: &ResponseMeta) -> String {
    let mut text = String::new();
    if out.results.is_empty() {
        text.push_str(&format!(
            "No {} matches for \"{}\"\n",
            out.mode.as_str(),
            out.query
        ));
    }

    let offset = out.page.saturating_sub(1) * out.page_size;
    for (i, result) in out.results.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} [{}]\n",
            offset + i + 1,
            result.path(),
            result.process_name
        ));
        for hit in &result.matches {
            text.push_str(&format!(
                "   {} {}: {}\n",
                hit.element_kind, hit.element_id, hit.label
            ));
            if let Some(matched) = &hit.matched_text {
                text.push_str(&format!("      > {}\n", one_line(matched, 100)));
            }
        }
    }

    if out.total_pages > 1 {
        text.push_str(&format!(
            "Page {}/{} ({} results)\n",
            out.page, out.total_pages, out.total
        ));
    }
    push_diagnostics(&mut text, meta);
    text
}

pub fn render_scan(out: &ScanOutput, meta: &ResponseMeta) -> String {
    let mut text = String::new();
    for doc in &out.documents {
        text.push_str(doc);
        text.push('\n');
    }
    text.push_str(&format!(
        "{} documents ({} bytes) under {}, {} skipped\n",
        out.stats.files, out.stats.bytes, out.root, out.stats.skipped
    ));
    push_diagnostics(&mut text, meta);
    text
}

fn push_diagnostics(text: &mut String, meta: &ResponseMeta) {
    for diagnostic in &meta.diagnostics {
        text.push_str(&format!("warning: {}: {}\n", diagnostic.path, diagnostic.message));
    }
}

fn one_line(raw: &str, max_chars: usize) -> String {
    let flat = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
