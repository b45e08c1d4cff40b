//! # dictbot Dictionary Lookup Client
//!
//! File: cli/src/common/network/dictionary.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! HTTP client for the public dictionary service. One `lookup` call performs
//! exactly one GET request to `{base}/{lowercased word}` and folds every
//! possible outcome into a `LookupResult`:
//!
//! | Outcome                                    | Result           | Log level |
//! |--------------------------------------------|------------------|-----------|
//! | HTTP 200 with a well-formed body           | `Found(entries)` | debug     |
//! | Any other HTTP status                      | `NotFound`       | warn      |
//! | Timeout, DNS, connection or read failure   | `TransientError` | error     |
//! | HTTP 200 with a body of the wrong shape    | `TransientError` | error     |
//!
//! No error value ever crosses this boundary and no retries are made.
//!
//! ## Lifecycle
//!
//! The client owns a pooled `reqwest::Client` that is created by `connect()`
//! and released by `close()`. The pool is shared by concurrent lookups; the
//! struct itself holds no other mutable state, so `&self` lookups can run in
//! parallel behind an `Arc`.
//!
//! ```rust
//! let mut client = DictionaryClient::from_config(&cfg)?;
//! client.connect()?;
//! let result = client.lookup(&LookupQuery::new("Computer")).await;
//! client.close();
//! ```
//!
use crate::core::config::{self, Config};
use crate::core::error::{DictbotError, Result};
use crate::core::model::{DefinitionEntry, DictionaryEntry, LookupQuery, LookupResult, MeaningGroup};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Client for the dictionary lookup service.
#[derive(Debug)]
pub struct DictionaryClient {
    base_url: Url,
    timeout: Duration,
    http: Option<reqwest::Client>,
}

impl DictionaryClient {
    /// Creates an unconnected client for `base_url`. Fails if the endpoint is
    /// not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: config::validate_endpoint(base_url)?,
            timeout,
            http: None,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.dictionary.api_url, cfg.lookup_timeout())
    }

    /// # Connect (`connect`)
    ///
    /// Builds the connection pool used by every subsequent lookup. The
    /// timeout set here bounds connect and read together. Calling it again
    /// while connected keeps the existing pool.
    ///
    /// ## Errors
    ///
    /// Returns `DictbotError::Http` if the TLS backend cannot be initialized.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!("Dictionary client already connected, keeping existing pool.");
            return Ok(());
        }
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| DictbotError::Http { source })?;
        self.http = Some(http);
        info!(
            "Dictionary client connected to {} (timeout {:?})",
            self.base_url, self.timeout
        );
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.http.is_some()
    }

    /// Releases the connection pool. A no-op when never connected.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            info!("Dictionary client closed.");
        }
    }

    /// The request URL for `query`: the lowercased text appended to the base
    /// endpoint as a single percent-encoded path segment.
    pub fn lookup_url(&self, query: &LookupQuery) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path; validate_endpoint guarantees the scheme.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&query.text.to_lowercase());
        }
        url
    }

    /// # Lookup (`lookup`)
    ///
    /// Performs one GET request for `query` and classifies the outcome.
    /// Never fails and never retries; see the module table for the mapping.
    pub async fn lookup(&self, query: &LookupQuery) -> LookupResult {
        let Some(http) = self.http.as_ref() else {
            error!(
                "Dictionary lookup for '{}' attempted before connect()",
                query.text
            );
            return LookupResult::TransientError;
        };

        let url = self.lookup_url(query);
        debug!("Looking up '{}' at {}", query.text, url);

        let response = match http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "Dictionary API request for '{}' failed: {}",
                    query.text,
                    describe_transport_error(&e)
                );
                return LookupResult::TransientError;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                "No definition found for '{}' (status {})",
                query.text,
                status.as_u16()
            );
            return LookupResult::NotFound;
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "Failed to read dictionary API response for '{}': {}",
                    query.text,
                    describe_transport_error(&e)
                );
                return LookupResult::TransientError;
            }
        };

        match serde_json::from_slice::<Vec<ApiEntry>>(&body) {
            Ok(raw) => {
                let entries = normalize_entries(raw);
                if entries.is_empty() {
                    warn!(
                        "Dictionary API returned no usable entries for '{}'",
                        query.text
                    );
                    LookupResult::NotFound
                } else {
                    debug!("Found {} entries for '{}'", entries.len(), query.text);
                    LookupResult::Found(entries)
                }
            }
            Err(e) => {
                error!(
                    "Malformed dictionary API response for '{}': {}",
                    query.text, e
                );
                LookupResult::TransientError
            }
        }
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out ({})", e)
    } else if e.is_connect() {
        format!("connection failed ({})", e)
    } else {
        e.to_string()
    }
}

// --- Wire format ---
// Upstream fields are all optional; extra fields (phonetics, synonyms,
// license, sourceUrls, ...) are ignored.

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ApiEntry {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Deserialize, Debug)]
struct ApiDefinition {
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example: Option<String>,
}

/// Converts wire entries into the domain model, dropping entries without a word.
fn normalize_entries(raw: Vec<ApiEntry>) -> Vec<DictionaryEntry> {
    raw.into_iter()
        .filter_map(|entry| {
            let word = entry.word.filter(|w| !w.trim().is_empty())?;
            Some(DictionaryEntry {
                word,
                phonetic: entry.phonetic.filter(|p| !p.trim().is_empty()),
                meanings: entry
                    .meanings
                    .into_iter()
                    .map(|meaning| MeaningGroup {
                        part_of_speech: meaning.part_of_speech.unwrap_or_default(),
                        definitions: meaning
                            .definitions
                            .into_iter()
                            .map(|d| DefinitionEntry {
                                definition: d.definition.unwrap_or_default(),
                                example: d.example.filter(|e| !e.is_empty()),
                            })
                            .collect(),
                    })
                    .collect(),
            })
        })
        .collect()
}
