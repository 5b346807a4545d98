use crate::grouping::SearchResult;

/// Results whose folder, file name or process name contains `filter`,
/// case-insensitively. A blank filter keeps everything in order.
pub fn filter_results<'a>(results: &'a [SearchResult], filter: &str) -> Vec<&'a SearchResult> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return results.iter().collect();
    }
    results
        .iter()
        .filter(|result| {
            [&result.folder_path, &result.file_name, &result.process_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
