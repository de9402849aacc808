//! Label suggestions
//!
//!     Editors suggest labels while the user types. The lookup itself is done by an
//!     external search service ([LabelSearch]); this module memoizes it and keeps a
//!     [LabelGraph] of every label the service has told us about, so aliases found by
//!     one query can point at masters found by another.
//!
//!     Lookup for `(namespace, text)`:
//!
//!     1. Normalize the text (trim, lower-case) and return the memoized result if any.
//!     2. Ask the service for `namespace:text` (or just `text`).
//!     3. Nothing found and the text has a `.`: go again with the text before the last
//!        `.`, so `foo.bar` becomes `foo`. Every round drops at least the `.`, so this
//!        ends.
//!     4. Memoize the final result, empty or not, under every key visited.
//!
//!     A failing service call is logged and returned, and nothing is memoized for it.
//!     Identical lookups running at the same time both reach the service.

use crate::error::{SearchFailure, SuggestError};
use async_trait::async_trait;
use lru::LruCache;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tagdb_config::SuggestConfig;
use tagdb_parser::Namespace;
use tracing::{debug, error};

/// One entry of a search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagDescriptor {
    Slave {
        id: u64,
        ns: String,
        tn: String,
        mid: u64,
        mns: String,
        mtn: String,
    },
    Master {
        id: u64,
        ns: String,
        tn: String,
    },
}

/// Response of the search service.
///
/// The service answers `[]` when nothing matched and an object keyed by label id
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    Tags(BTreeMap<u64, TagDescriptor>),
    Empty,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResponse::Tags(tags) => tags.is_empty(),
            SearchResponse::Empty => true,
        }
    }
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Tags(BTreeMap<String, TagDescriptor>),
            Empty(Vec<serde::de::IgnoredAny>),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Empty(items) if items.is_empty() => Ok(SearchResponse::Empty),
            Wire::Empty(_) => Err(D::Error::custom("expected a tag map or an empty array")),
            Wire::Tags(tags) => tags
                .into_iter()
                .map(|(id, tag)| {
                    id.parse::<u64>()
                        .map(|id| (id, tag))
                        .map_err(|_| D::Error::custom(format!("invalid tag id {:?}", id)))
                })
                .collect::<Result<BTreeMap<u64, TagDescriptor>, D::Error>>()
                .map(SearchResponse::Tags),
        }
    }
}

/// The external label search service.
#[async_trait]
pub trait LabelSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchFailure>;
}

/// A label known to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    pub id: u64,
    pub namespace: Namespace,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<u64>,
}

/// Every label seen so far, keyed by id. Shared by all users of the search service.
#[derive(Debug, Default)]
pub struct LabelGraph {
    labels: RwLock<HashMap<u64, Label>>,
}

impl LabelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a label. The last insert for an id wins.
    pub fn insert(&self, label: Label) {
        self.labels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(label.id, label);
    }

    pub fn get(&self, id: u64) -> Option<Label> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// The master of an alias, if the graph knows it.
    pub fn master_of(&self, id: u64) -> Option<Label> {
        self.get(id)?.master.and_then(|master| self.get(master))
    }

    pub fn len(&self) -> usize {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert everything in a response, masters first, and return the labels it lists.
    pub fn materialize(&self, tags: &BTreeMap<u64, TagDescriptor>) -> Vec<Label> {
        for tag in tags.values() {
            match tag {
                TagDescriptor::Master { id, ns, tn } => self.insert(Label {
                    id: *id,
                    namespace: namespace_or_temp(ns),
                    raw: tn.clone(),
                    master: None,
                }),
                TagDescriptor::Slave { mid, mns, mtn, .. } => self.insert(Label {
                    id: *mid,
                    namespace: namespace_or_temp(mns),
                    raw: mtn.clone(),
                    master: None,
                }),
            }
        }

        tags.values()
            .map(|tag| match tag {
                TagDescriptor::Master { id, ns, tn } => Label {
                    id: *id,
                    namespace: namespace_or_temp(ns),
                    raw: tn.clone(),
                    master: None,
                },
                TagDescriptor::Slave {
                    id, ns, tn, mid, ..
                } => {
                    let label = Label {
                        id: *id,
                        namespace: namespace_or_temp(ns),
                        raw: tn.clone(),
                        master: Some(*mid),
                    };
                    self.insert(label.clone());
                    label
                }
            })
            .collect()
    }
}

fn namespace_or_temp(ns: &str) -> Namespace {
    ns.parse().unwrap_or(Namespace::Temp)
}

type CacheKey = (Option<Namespace>, String);

/// Memoizing front of a [LabelSearch] service.
pub struct SuggestCache {
    search: Arc<dyn LabelSearch>,
    graph: Arc<LabelGraph>,
    cache: Mutex<LruCache<CacheKey, Vec<Label>>>,
}

impl SuggestCache {
    pub fn new(search: Arc<dyn LabelSearch>, graph: Arc<LabelGraph>, capacity: NonZeroUsize) -> Self {
        Self {
            search,
            graph,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn from_config(
        search: Arc<dyn LabelSearch>,
        graph: Arc<LabelGraph>,
        config: &SuggestConfig,
    ) -> Self {
        Self::new(search, graph, config.capacity)
    }

    pub fn graph(&self) -> &Arc<LabelGraph> {
        &self.graph
    }

    pub async fn suggest(
        &self,
        namespace: Option<Namespace>,
        text: &str,
    ) -> Result<Vec<Label>, SuggestError> {
        let mut text = text.trim().to_lowercase();
        let mut visited = Vec::new();

        let result = loop {
            let key = (namespace, text.clone());
            if let Some(hit) = self.cached(&key) {
                break hit;
            }
            visited.push(key);

            if !text.is_empty() {
                let labels = self.lookup(namespace, &text).await?;
                if !labels.is_empty() {
                    break labels;
                }
            }

            match text.rfind('.') {
                Some(index) => {
                    text.truncate(index);
                    debug!(query = %text, "no labels found, retrying shorter query");
                }
                None => break Vec::new(),
            }
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        for key in visited {
            cache.put(key, result.clone());
        }
        Ok(result)
    }

    fn cached(&self, key: &CacheKey) -> Option<Vec<Label>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn lookup(
        &self,
        namespace: Option<Namespace>,
        text: &str,
    ) -> Result<Vec<Label>, SuggestError> {
        let query = match namespace {
            Some(ns) => format!("{}:{}", ns, text),
            None => text.to_string(),
        };

        match self.search.search(&query).await {
            Ok(SearchResponse::Tags(tags)) => Ok(self.graph.materialize(&tags)),
            Ok(SearchResponse::Empty) => Ok(Vec::new()),
            Err(source) => {
                error!(%query, error = %source, "label search failed");
                Err(SuggestError::Search { query, source })
            }
        }
    }
}
