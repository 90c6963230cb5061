//! Locale bundle loader
//!
//! A bundle is the pair of files `locales/<lang>.json` (message catalog)
//! and `flows/<lang>.json` (flow graph) under one data directory. Loading a
//! non-default language that fails falls back to the default with a
//! warning; the default failing is the caller's configuration error.

use crate::catalog::MessageCatalog;
use crate::error::LocaleError;
use padron_flow::{FlowGraph, FINAL_REVIEW_STEP};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Catalog key substituted into the review step's text
const REVIEW_INSTRUCTIONS_KEY: &str = "final_document_review_instructions";

/// One language's catalog plus its validated flow graph
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    /// Language code (file stem, e.g. `es`)
    pub lang: String,
    /// Localized messages
    pub messages: MessageCatalog,
    /// Questionnaire graph in this language
    pub flow: FlowGraph,
}

/// Loads locale bundles from a data directory
#[derive(Debug, Clone)]
pub struct LocaleLoader {
    data_dir: PathBuf,
    default_lang: String,
}

impl LocaleLoader {
    /// Loader over `data_dir` with the given default language
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, default_lang: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_lang: default_lang.into(),
        }
    }

    /// Configured default language
    #[inline]
    #[must_use]
    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    fn read(path: &Path) -> Result<String, LocaleError> {
        std::fs::read_to_string(path).map_err(|source| LocaleError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// Load one language's bundle
    pub fn load(&self, lang: &str) -> Result<LocaleBundle, LocaleError> {
        let catalog_path = self.data_dir.join("locales").join(format!("{lang}.json"));
        let flow_path = self.data_dir.join("flows").join(format!("{lang}.json"));

        let messages: MessageCatalog = serde_json::from_str(&Self::read(&catalog_path)?)
            .map_err(|source| LocaleError::Parse {
                path: catalog_path,
                source,
            })?;

        let mut flow_value: Value = serde_json::from_str(&Self::read(&flow_path)?).map_err(
            |source| LocaleError::Parse {
                path: flow_path.clone(),
                source,
            },
        )?;
        substitute_review_instructions(&mut flow_value, &messages);

        let flow = FlowGraph::from_json(&flow_value.to_string()).map_err(|source| {
            LocaleError::Flow {
                lang: lang.to_owned(),
                source,
            }
        })?;

        tracing::info!(lang, steps = flow.len(), messages = messages.len(), "locale bundle loaded");
        Ok(LocaleBundle {
            lang: lang.to_owned(),
            messages,
            flow,
        })
    }

    /// Load a language, falling back to the default when it fails
    ///
    /// Only a failure of the default language itself is returned.
    pub fn load_or_default(&self, lang: &str) -> Result<LocaleBundle, LocaleError> {
        if lang == self.default_lang {
            return self.load(lang);
        }
        match self.load(lang) {
            Ok(bundle) => Ok(bundle),
            Err(err) => {
                tracing::warn!(lang, default = %self.default_lang, error = %err, "locale unavailable, falling back");
                self.load(&self.default_lang)
            }
        }
    }

    /// Languages with both a catalog and a flow file on disk
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let stems = |subdir: &str| -> Vec<String> {
            std::fs::read_dir(self.data_dir.join(subdir))
                .into_iter()
                .flatten()
                .filter_map(Result::ok)
                .filter_map(|entry| {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        path.file_stem().map(|s| s.to_string_lossy().into_owned())
                    } else {
                        None
                    }
                })
                .collect()
        };

        let flows = stems("flows");
        let mut langs: Vec<String> = stems("locales")
            .into_iter()
            .filter(|lang| flows.contains(lang))
            .collect();
        langs.sort();
        langs
    }
}

/// Replace the review step's placeholder text with the catalog message
fn substitute_review_instructions(flow_value: &mut Value, messages: &MessageCatalog) {
    let Some(steps) = flow_value.get_mut("flow").and_then(Value::as_array_mut) else {
        return;
    };
    for step in steps {
        let is_review = step.get("id").and_then(Value::as_str) == Some(FINAL_REVIEW_STEP);
        let is_placeholder =
            step.get("text").and_then(Value::as_str) == Some(REVIEW_INSTRUCTIONS_KEY);
        if is_review && is_placeholder {
            step["text"] = Value::String(messages.text(REVIEW_INSTRUCTIONS_KEY).to_owned());
        }
    }
}
