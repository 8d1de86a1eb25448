use serde::Deserialize;

/// Frequency statistics for a single word form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// Surface form exactly as it occurs in the corpus ("Net" vs "net").
    pub true_case: String,

    /// Raw occurrence count.
    pub frequency: u64,

    /// Occurrence rate per million corpus tokens.
    pub normalized_frequency: f64,

    /// Dictionary headword this form belongs to.
    #[serde(default)]
    pub lemma: Option<String>,

    #[serde(default)]
    pub wordform: Option<String>,

    #[serde(default)]
    pub lexical_category: Option<String>,
}

/// Frequency statistics for a single n-gram.
#[derive(Debug, Clone, Deserialize)]
pub struct NgramEntry {
    /// The n-gram's words in order.
    pub tokens: Vec<String>,

    /// Raw occurrence count.
    pub frequency: u64,
}

/// One page of a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub metadata: Metadata,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Total number of matches on the server, across all pages.
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub options: Option<PageOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageOptions {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Single-result payload shape (`{ "result": ... }`).
#[derive(Debug, Deserialize)]
pub(crate) struct Single<T> {
    pub result: T,
}

/// Term-to-frequency pairs in the caller's term order.
pub type FrequencyMap = Vec<(String, u64)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_entry_decodes_camel_case_fields() {
        let entry: WordEntry = serde_json::from_value(serde_json::json!({
            "trueCase": "Net",
            "frequency": 1638,
            "normalizedFrequency": 0.79,
            "lemma": "net",
            "lexicalCategory": "noun"
        }))
        .unwrap();

        assert_eq!(entry.true_case, "Net");
        assert_eq!(entry.frequency, 1638);
        assert_eq!(entry.normalized_frequency, 0.79);
        assert_eq!(entry.lemma.as_deref(), Some("net"));
        assert_eq!(entry.wordform, None);
        assert_eq!(entry.lexical_category.as_deref(), Some("noun"));
    }

    #[test]
    fn test_page_decodes_results_and_metadata() {
        let page: Page<NgramEntry> = serde_json::from_value(serde_json::json!({
            "results": [
                { "tokens": ["unit", "test"], "frequency": 352 }
            ],
            "metadata": {
                "total": 241,
                "options": { "limit": 100, "offset": 0 }
            }
        }))
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].tokens, vec!["unit", "test"]);
        assert_eq!(page.metadata.total, 241);
        assert_eq!(page.metadata.options.unwrap().limit, 100);
    }

    #[test]
    fn test_page_tolerates_missing_results() {
        let page: Page<WordEntry> = serde_json::from_value(serde_json::json!({
            "metadata": { "total": 0 }
        }))
        .unwrap();

        assert!(page.results.is_empty());
        assert_eq!(page.metadata.total, 0);
    }
}
