//! Query shortcuts and search execution for one entity type.
//!
//! An [`EntityScope`] binds a prototype entity (which fixes the collection and
//! category searched) to the service and a result-size cap. Shortcut methods
//! build a [`QueryBody`] and run it; `search` and `count` take any body.

use flex_shared::{
    DocumentHit, DocumentKey, IndexTarget, MoreLikeThisOptions, QueryBody, RawSearchResponse,
    SearchResults,
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::FlexError;
use crate::indexable::Indexable;
use crate::service::FlexService;

impl FlexService {
    /// Query scope for `T`, using `T::default()` as the prototype.
    pub fn scope<T: Indexable + Default>(&self) -> EntityScope<'_, T> {
        self.scope_of(T::default())
    }

    /// Query scope for the entity type of `prototype`.
    ///
    /// Hits are hydrated through the prototype, so runtime configuration such
    /// as a dynamic table name carries over to the results.
    pub fn scope_of<T: Indexable>(&self, prototype: T) -> EntityScope<'_, T> {
        EntityScope {
            service: self,
            result_size: self.config().result_size,
            prototype,
        }
    }
}

/// Search handle for one entity type.
pub struct EntityScope<'a, T: Indexable> {
    service: &'a FlexService,
    prototype: T,
    result_size: usize,
}

impl<'a, T: Indexable> EntityScope<'a, T> {
    /// Override the hit cap used by the shortcuts.
    pub fn with_result_size(mut self, result_size: usize) -> Self {
        self.result_size = result_size;
        self
    }

    pub fn result_size(&self) -> usize {
        self.result_size
    }

    pub fn prototype(&self) -> &T {
        &self.prototype
    }

    /// The (collection, category) pair this scope searches.
    pub fn target(&self) -> IndexTarget {
        self.service.target(&self.prototype)
    }

    /// `match` on a single field.
    pub async fn match_query(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<SearchResults<T>, FlexError> {
        self.run(QueryBody::match_field(field, value)).await
    }

    pub async fn multi_match<I, S>(
        &self,
        fields: I,
        value: impl Into<Value>,
    ) -> Result<SearchResults<T>, FlexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(QueryBody::multi_match(fields, value)).await
    }

    /// `fuzzy` with `AUTO` fuzziness.
    pub async fn fuzzy(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<SearchResults<T>, FlexError> {
        self.run(QueryBody::fuzzy(field, value)).await
    }

    pub async fn fuzzy_with(
        &self,
        field: &str,
        value: impl Into<Value>,
        fuzziness: &str,
    ) -> Result<SearchResults<T>, FlexError> {
        self.run(QueryBody::fuzzy_with(field, value, fuzziness))
            .await
    }

    /// `geo_shape` with an `envelope` shape.
    pub async fn geoshape(
        &self,
        field: &str,
        coordinates: Value,
    ) -> Result<SearchResults<T>, FlexError> {
        self.run(QueryBody::geoshape(field, coordinates)).await
    }

    pub async fn geoshape_with_type(
        &self,
        field: &str,
        coordinates: Value,
        shape_type: &str,
    ) -> Result<SearchResults<T>, FlexError> {
        self.run(QueryBody::geoshape_with_type(field, coordinates, shape_type))
            .await
    }

    /// Fetch documents by primary key.
    pub async fn ids<I>(&self, keys: I) -> Result<SearchResults<T>, FlexError>
    where
        I: IntoIterator<Item = DocumentKey>,
    {
        self.run(QueryBody::ids(keys)).await
    }

    /// Documents similar to the given ones, with default tuning.
    pub async fn more_like_this<I, S, K>(
        &self,
        fields: I,
        ids: K,
    ) -> Result<SearchResults<T>, FlexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        K: IntoIterator<Item = DocumentKey>,
    {
        self.more_like_this_with(fields, ids, MoreLikeThisOptions::default())
            .await
    }

    pub async fn more_like_this_with<I, S, K>(
        &self,
        fields: I,
        ids: K,
        options: MoreLikeThisOptions,
    ) -> Result<SearchResults<T>, FlexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        K: IntoIterator<Item = DocumentKey>,
    {
        self.run(QueryBody::more_like_this(fields, ids, options))
            .await
    }

    /// Execute `body` verbatim and hydrate the hits.
    #[instrument(skip(self, body), fields(table = self.prototype.table()))]
    pub async fn search(&self, body: &Value) -> Result<SearchResults<T>, FlexError> {
        let target = self.target();
        let response = self.service.client().search(&target, body).await?;

        let raw: RawSearchResponse = serde_json::from_value(response)
            .map_err(|e| FlexError::parse(format!("Failed to parse search response: {}", e)))?;

        let results = self.hydrate(raw)?;
        debug!(
            target = %target,
            hits = results.len(),
            total = results.total,
            took_ms = results.took_ms,
            "Search completed"
        );
        Ok(results)
    }

    /// Count the documents matching `body`.
    pub async fn count(&self, body: &Value) -> Result<u64, FlexError> {
        self.service.client().count(&self.target(), body).await
    }

    async fn run(&self, query: QueryBody) -> Result<SearchResults<T>, FlexError> {
        let body = query.with_size(self.result_size).into_body();
        self.search(&body).await
    }

    fn hydrate(&self, raw: RawSearchResponse) -> Result<SearchResults<T>, FlexError> {
        let total = raw
            .hits
            .total
            .as_ref()
            .map(|total| total.value())
            .unwrap_or(raw.hits.hits.len() as u64);

        let hits = raw
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let meta = hit.meta();
                let entity = self.prototype.hydrate(hit.source)?;
                Ok(DocumentHit::new(entity, meta))
            })
            .collect::<Result<Vec<_>, FlexError>>()?;

        Ok(SearchResults {
            hits,
            total,
            took_ms: raw.took,
            max_score: raw.hits.max_score,
        })
    }
}
