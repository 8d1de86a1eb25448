use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::query::{NgramQuery, WordQuery};
use crate::rate_limit::Pacer;
use crate::score::{self, WordScore};
use crate::stats::{FrequencyMap, NgramEntry, Page, Single, WordEntry};

pub const DEFAULT_ENDPOINT: &str = "https://od-api.oxforddictionaries.com/api/v1";

/// The API serves at most this many items per page.
pub const PAGE_LIMIT: usize = 100;

/// The API accepts at most this many values in one batched list parameter.
pub const BATCH_LIMIT: usize = 10;

/// The n-gram endpoint serves orders 2 through 4, so batched terms can carry
/// at most this many tokens.
pub const MAX_NGRAM_TOKENS: usize = 4;

/// Normalized frequencies are reported per this many corpus tokens.
const NORMALIZATION_BASE: f64 = 1_000_000.0;

/// Options for constructing a [`StatsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub app_id: String,
    pub app_key: String,
    pub endpoint: String,
    /// Extra headers merged into every request. An entry here takes
    /// precedence over the credential arguments of the same name.
    pub headers: Vec<(String, String)>,
    pub requests_per_minute: u32,
}

impl ClientOptions {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headers: Vec::new(),
            requests_per_minute: 60,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_requests_per_minute(mut self, requests_per_minute: u32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }
}

/// Client for the corpus frequency statistics endpoints.
///
/// All methods complete only when the full round trip, including any
/// pagination continuations, has finished. One instance can be shared
/// across tasks; outgoing requests are serialized by the rate limiter.
#[derive(Debug)]
pub struct StatsClient {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
    pacer: Pacer,
    requests_sent: AtomicU64,
    corpus_size: OnceCell<f64>,
}

impl StatsClient {
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        if options.requests_per_minute == 0 {
            return Err(Error::Config(
                "requests_per_minute must be greater than zero".to_string(),
            ));
        }
        Url::parse(&options.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {}", options.endpoint, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        // Credential arguments fill in only where the extra headers did not.
        if !headers.contains_key("app_id") && !options.app_id.is_empty() {
            let value = HeaderValue::from_str(&options.app_id)
                .map_err(|e| Error::Config(format!("invalid app_id: {}", e)))?;
            headers.insert(HeaderName::from_static("app_id"), value);
        }
        if !headers.contains_key("app_key") && !options.app_key.is_empty() {
            let value = HeaderValue::from_str(&options.app_key)
                .map_err(|e| Error::Config(format!("invalid app_key: {}", e)))?;
            headers.insert(HeaderName::from_static("app_key"), value);
        }
        if !headers.contains_key("app_id") || !headers.contains_key("app_key") {
            return Err(Error::Config(
                "both app_id and app_key credentials are required".to_string(),
            ));
        }

        if let Some(accept) = headers.get(ACCEPT) {
            if accept.to_str().map_or(true, |v| v != "application/json") {
                return Err(Error::Config(
                    "the client can only consume JSON responses".to_string(),
                ));
            }
        }
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
            headers,
            pacer: Pacer::new(options.requests_per_minute),
            requests_sent: AtomicU64::new(0),
            corpus_size: OnceCell::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut options = ClientOptions::new(&config.api.app_id, &config.api.app_key)
            .with_requests_per_minute(config.api.requests_per_minute);
        if let Some(endpoint) = &config.api.endpoint {
            options = options.with_endpoint(endpoint);
        }
        Self::new(options)
    }

    /// Number of HTTP requests this client has sent, pagination
    /// continuations included.
    pub fn request_count(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Statistics for the single best word match.
    pub async fn word_stats(&self, query: &WordQuery) -> Result<WordEntry, Error> {
        let params = query.to_params()?;
        self.fetch_one("/stats/frequency/word/en/", params).await
    }

    /// Every word form matching the filters, across all result pages.
    pub async fn word_stats_list(&self, query: &WordQuery) -> Result<Vec<WordEntry>, Error> {
        self.word_stats_list_with_limit(query, None).await
    }

    /// Like [`word_stats_list`](Self::word_stats_list) but stops once
    /// `length` results have been collected.
    pub async fn word_stats_list_with_limit(
        &self,
        query: &WordQuery,
        length: Option<usize>,
    ) -> Result<Vec<WordEntry>, Error> {
        let params = query.to_params()?;
        self.fetch_all("/stats/frequency/words/en/", params, length)
            .await
    }

    /// Every n-gram matching the query, across all result pages.
    pub async fn ngrams(&self, query: &NgramQuery) -> Result<Vec<NgramEntry>, Error> {
        let params = query.to_params()?;
        let path = format!("/stats/frequency/ngrams/en/nmc/{}/", query.n);
        self.fetch_all(&path, params, query.length).await
    }

    /// Corpus frequency of a word or a phrase. A term without spaces is
    /// looked up as a true case; a phrase goes through the n-gram endpoint
    /// with `n` = number of tokens.
    pub async fn frequency(&self, term: &str) -> Result<u64, Error> {
        self.frequency_with_category(term, None).await
    }

    /// Like [`frequency`](Self::frequency), optionally constrained to a
    /// lexical category (single words only; the n-gram endpoint has no
    /// category filter).
    pub async fn frequency_with_category(
        &self,
        term: &str,
        lexical_category: Option<&str>,
    ) -> Result<u64, Error> {
        let spaces = term.matches(' ').count();
        if spaces == 0 {
            let mut query = WordQuery::true_case(term);
            if let Some(lexical_category) = lexical_category {
                query = query.with_lexical_category(lexical_category);
            }
            Ok(self.word_stats(&query).await?.frequency)
        } else {
            let query = NgramQuery::tokens((spaces + 1) as u32, term);
            let results = self.ngrams(&query).await?;
            Ok(results.first().map(|entry| entry.frequency).unwrap_or(0))
        }
    }

    /// Frequencies for several terms at once, with one batched request per
    /// n-gram order instead of one request per term.
    ///
    /// The returned pairs preserve the caller's term order; terms the corpus
    /// does not know map to 0. Multiple result entries normalizing to the
    /// same true case are summed.
    pub async fn frequencies(&self, terms: &[&str]) -> Result<FrequencyMap, Error> {
        // partitions[k] holds the terms of k+1 tokens.
        let mut partitions: [Vec<&str>; MAX_NGRAM_TOKENS] = Default::default();
        for &term in terms {
            let spaces = term.matches(' ').count();
            if spaces >= MAX_NGRAM_TOKENS {
                return Err(Error::Argument(format!(
                    "term {:?} has more than {} tokens",
                    term, MAX_NGRAM_TOKENS
                )));
            }
            partitions[spaces].push(term);
        }
        for (index, partition) in partitions.iter().enumerate() {
            if partition.len() > BATCH_LIMIT {
                return Err(Error::Argument(format!(
                    "at most {} terms of {} token(s) can be batched per call",
                    BATCH_LIMIT,
                    index + 1
                )));
            }
        }

        let mut counts: HashMap<String, u64> = HashMap::new();

        let words = &partitions[0];
        if !words.is_empty() {
            let params: Vec<(String, String)> = words
                .iter()
                .map(|word| ("trueCases".to_string(), word.to_string()))
                .collect();
            let results: Vec<WordEntry> = self
                .fetch_all("/stats/frequency/words/en/", params, None)
                .await?;
            for entry in results {
                *counts.entry(entry.true_case).or_insert(0) += entry.frequency;
            }
        }

        for n in 2..=MAX_NGRAM_TOKENS {
            let phrases = &partitions[n - 1];
            if phrases.is_empty() {
                continue;
            }
            let params: Vec<(String, String)> = phrases
                .iter()
                .map(|phrase| ("tokens".to_string(), phrase.to_string()))
                .collect();
            let path = format!("/stats/frequency/ngrams/en/nmc/{}/", n);
            let results: Vec<NgramEntry> = self.fetch_all(&path, params, None).await?;
            for entry in results {
                *counts.entry(entry.tokens.join(" ")).or_insert(0) += entry.frequency;
            }
        }

        let mut map: FrequencyMap = Vec::with_capacity(terms.len());
        for &term in terms {
            if map.iter().any(|(seen, _)| seen == term) {
                continue;
            }
            map.push((term.to_string(), counts.get(term).copied().unwrap_or(0)));
        }
        Ok(map)
    }

    /// Pointwise mutual information of a word pair:
    /// `log2(C(w1 w2)) + log2(N) - log2(C(w1)) - log2(C(w2))`.
    ///
    /// Returns `0.0` when any of the three counts is zero, so an unattested
    /// pair never turns into a log-of-zero error.
    pub async fn pmi(&self, word1: &str, word2: &str) -> Result<f64, Error> {
        let pair = format!("{} {}", word1, word2);
        let frequencies = self.frequencies(&[pair.as_str(), word1, word2]).await?;
        let count = |term: &str| {
            frequencies
                .iter()
                .find(|(seen, _)| seen == term)
                .map(|(_, count)| *count)
                .unwrap_or(0)
        };

        let pair_count = count(&pair);
        let count1 = count(word1);
        let count2 = count(word2);
        if pair_count == 0 || count1 == 0 || count2 == 0 {
            return Ok(0.0);
        }

        let corpus_size = self.corpus_size().await?;
        Ok((pair_count as f64).log2() + corpus_size.log2()
            - (count1 as f64).log2()
            - (count2 as f64).log2())
    }

    /// Estimated corpus token count, derived from the normalized frequency
    /// of "the" and memoized for the lifetime of this client.
    pub async fn corpus_size(&self) -> Result<f64, Error> {
        self.corpus_size
            .get_or_try_init(|| async {
                let stats = self.word_stats(&WordQuery::true_case("the")).await?;
                Ok(stats.normalized_frequency * NORMALIZATION_BASE)
            })
            .await
            .copied()
    }

    /// Distinct corpus spellings of a lemma, sorted.
    pub async fn wordforms(
        &self,
        lemma: &str,
        lexical_category: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        let mut query = WordQuery::lemma(lemma);
        if let Some(lexical_category) = lexical_category {
            query = query.with_lexical_category(lexical_category);
        }
        let results = self.word_stats_list(&query).await?;
        let mut forms: Vec<String> = results.into_iter().map(|entry| entry.true_case).collect();
        forms.sort();
        forms.dedup();
        Ok(forms)
    }

    /// Length-and-rarity score of a word, banded by normalized frequency.
    pub async fn word_score(&self, word: &str) -> Result<WordScore, Error> {
        let stats = self.word_stats(&WordQuery::true_case(word)).await?;
        Ok(score::word_score(word, &stats))
    }

    /// Of two words or phrases, the one occurring more often; ties go to the
    /// first.
    pub async fn more_frequent<'a>(
        &self,
        term1: &'a str,
        term2: &'a str,
    ) -> Result<&'a str, Error> {
        if self.frequency(term1).await? < self.frequency(term2).await? {
            Ok(term2)
        } else {
            Ok(term1)
        }
    }

    async fn send(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<reqwest::Response, Error> {
        self.pacer.acquire().await;
        self.requests_sent.fetch_add(1, Ordering::Relaxed);

        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .headers(self.headers.clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %url, "stats API request failed");
            return Err(Error::Request {
                status,
                message: body_excerpt(&body),
            });
        }
        Ok(response)
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, Error> {
        let response = self.send(path, &params).await?;
        let single: Single<T> = response.json().await?;
        Ok(single.result)
    }

    /// Paginated fetch. `length` is a remaining-items budget, decremented by
    /// each page's actual item count; `None` means everything the server has.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        length: Option<usize>,
    ) -> Result<Vec<T>, Error> {
        let mut results: Vec<T> = Vec::new();
        let mut offset: usize = 0;
        let mut remaining = length;

        loop {
            let limit = remaining.map_or(PAGE_LIMIT, |r| r.min(PAGE_LIMIT));
            if limit == 0 {
                break;
            }

            let mut page_params = params.clone();
            page_params.push(("limit".to_string(), limit.to_string()));
            page_params.push(("offset".to_string(), offset.to_string()));

            let response = self.send(path, &page_params).await?;
            let page: Page<T> = response.json().await?;

            let fetched = page.results.len();
            if let Some(r) = remaining.as_mut() {
                *r -= fetched.min(*r);
            }
            results.extend(page.results);
            offset += limit;

            let total = page.metadata.total as usize;
            if total <= offset || remaining == Some(0) || fetched == 0 {
                debug!(collected = results.len(), total, "pagination complete");
                break;
            }
        }
        Ok(results)
    }
}

/// Last non-blank line of a response body, for error diagnostics.
fn body_excerpt(body: &str) -> String {
    body.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}
