use crate::error::Error;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Filter set for the word statistics endpoints.
///
/// At least one of the four filters must be non-empty; the lexical category
/// is usually combined with one of the others to narrow it down.
#[derive(Debug, Clone, Default)]
pub struct WordQuery {
    pub true_case: Option<String>,
    pub lemma: Option<String>,
    pub wordform: Option<String>,
    pub lexical_category: Option<String>,
    /// Raw query parameters passed through unchanged
    /// (e.g. `grammaticalFeatures`).
    pub extra: Vec<(String, String)>,
}

impl WordQuery {
    pub fn true_case(true_case: impl Into<String>) -> Self {
        Self {
            true_case: Some(true_case.into()),
            ..Default::default()
        }
    }

    pub fn lemma(lemma: impl Into<String>) -> Self {
        Self {
            lemma: Some(lemma.into()),
            ..Default::default()
        }
    }

    pub fn wordform(wordform: impl Into<String>) -> Self {
        Self {
            wordform: Some(wordform.into()),
            ..Default::default()
        }
    }

    pub fn with_lexical_category(mut self, lexical_category: impl Into<String>) -> Self {
        self.lexical_category = Some(lexical_category.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>, Error> {
        let mut params = self.extra.clone();
        let mut any = false;

        if let Some(wordform) = non_empty(&self.wordform) {
            params.push(("wordform".to_string(), wordform.to_string()));
            any = true;
        }
        if let Some(true_case) = non_empty(&self.true_case) {
            params.push(("trueCase".to_string(), true_case.to_string()));
            any = true;
        }
        if let Some(lemma) = non_empty(&self.lemma) {
            params.push(("lemma".to_string(), lemma.to_string()));
            any = true;
        }
        if let Some(lexical_category) = non_empty(&self.lexical_category) {
            params.push(("lexicalCategory".to_string(), lexical_category.to_string()));
            any = true;
        }

        if !any {
            return Err(Error::Argument(
                "at least one of trueCase, lemma, wordform or lexicalCategory is required"
                    .to_string(),
            ));
        }
        Ok(params)
    }
}

/// Query for the n-gram endpoint: exactly one of `tokens` (literal n-gram
/// text) or `contains` (substring filter).
#[derive(Debug, Clone)]
pub struct NgramQuery {
    /// N-gram order; the API serves orders 2 through 4.
    pub n: u32,
    pub tokens: Option<String>,
    pub contains: Option<String>,
    /// Ceiling on the total number of results fetched across pages.
    pub length: Option<usize>,
    pub extra: Vec<(String, String)>,
}

impl NgramQuery {
    pub fn new(n: u32) -> Self {
        Self {
            n,
            tokens: None,
            contains: None,
            length: None,
            extra: Vec::new(),
        }
    }

    pub fn tokens(n: u32, tokens: impl Into<String>) -> Self {
        Self::new(n).with_tokens(tokens)
    }

    pub fn contains(n: u32, contains: impl Into<String>) -> Self {
        Self::new(n).with_contains(contains)
    }

    pub fn with_tokens(mut self, tokens: impl Into<String>) -> Self {
        self.tokens = Some(tokens.into());
        self
    }

    pub fn with_contains(mut self, contains: impl Into<String>) -> Self {
        self.contains = Some(contains.into());
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>, Error> {
        let tokens = non_empty(&self.tokens);
        let contains = non_empty(&self.contains);

        match (tokens, contains) {
            (None, None) => Err(Error::Argument(
                "one of tokens or contains is required".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::Argument(
                "tokens and contains are mutually exclusive".to_string(),
            )),
            (Some(tokens), None) => {
                let mut params = self.extra.clone();
                params.push(("tokens".to_string(), tokens.to_string()));
                Ok(params)
            }
            (None, Some(contains)) => {
                let mut params = self.extra.clone();
                params.push(("contains".to_string(), contains.to_string()));
                Ok(params)
            }
        }
    }
}
