//! The lookup orchestrator

use crate::config::LookupConfig;
use crate::core::column::LookupColumns;
use crate::core::error::{ConfigError, LookupError};
use crate::core::filter::LookupFilter;
use crate::core::handlers::{DefaultHandlers, LookupContext, LookupHandlers};
use crate::core::query::{FieldRef, LookupQuery};
use crate::core::record::LookupRecord;
use crate::core::result::{LookupData, LookupRow};
use crate::core::store::RecordSource;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

/// A configured lookup over records of type `R`.
///
/// The column registry is derived once at construction and shared read-only
/// afterwards; a `Lookup` can serve any number of concurrent requests.
///
/// # Example
///
/// ```rust,ignore
/// let lookup = Lookup::<Person>::new()?
///     .with_config(LookupConfig::from_yaml_file("people.yaml")?)?;
///
/// let data = lookup.get_data(&LookupFilter::by_search("ann"), &source).await?;
/// println!("{} matches", data.filtered_rows);
/// ```
pub struct Lookup<R: LookupRecord, H: LookupHandlers<R> = DefaultHandlers> {
    config: LookupConfig,
    columns: Arc<LookupColumns>,
    handlers: H,
    _marker: PhantomData<fn() -> R>,
}

impl<R: LookupRecord> Lookup<R, DefaultHandlers> {
    /// Lookup running every default pipeline step
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_handlers(DefaultHandlers)
    }
}

impl<R: LookupRecord, H: LookupHandlers<R>> Lookup<R, H> {
    /// Lookup whose pipeline steps are resolved through `handlers`
    pub fn with_handlers(handlers: H) -> Result<Self, ConfigError> {
        let columns = LookupColumns::derive::<R, H>(&handlers)?;
        debug!(
            record_type = R::type_name(),
            columns = columns.len(),
            "Derived lookup columns"
        );

        Ok(Self {
            config: LookupConfig::default(),
            columns: Arc::new(columns),
            handlers,
            _marker: PhantomData,
        })
    }

    /// Replace the configuration, checking declared additional filters
    /// against the record type
    pub fn with_config(mut self, config: LookupConfig) -> Result<Self, ConfigError> {
        for field in &config.additional_filters {
            check_field::<R>(field)?;
        }
        self.config = config;
        Ok(self)
    }

    pub fn columns(&self) -> &Arc<LookupColumns> {
        &self.columns
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    pub fn set_default_sort_column(&mut self, column: Option<String>) {
        self.config.default_sort_column = column;
    }

    /// Allow clients to filter on `field`
    pub fn add_additional_filter(&mut self, field: impl Into<String>) -> Result<(), ConfigError> {
        let field = field.into();
        check_field::<R>(&field)?;
        self.config.additional_filters.insert(field);
        Ok(())
    }

    pub fn additional_filters(&self) -> impl Iterator<Item = &str> {
        self.config.additional_filters.iter().map(|f| f.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.config.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.config.title = title;
    }

    pub fn dialog(&self) -> Option<&str> {
        self.config.dialog.as_deref()
    }

    pub fn set_dialog(&mut self, dialog: Option<String>) {
        self.config.dialog = dialog;
    }

    pub fn url(&self) -> Option<&str> {
        self.config.url.as_deref()
    }

    pub fn set_url(&mut self, url: Option<String>) {
        self.config.url = url;
    }

    pub fn multi(&self) -> bool {
        self.config.multi
    }

    pub fn set_multi(&mut self, multi: bool) {
        self.config.multi = multi;
    }

    /// Compose the filtered and sorted query a request describes, without
    /// paging
    pub fn build_query(&self, filter: &LookupFilter) -> Result<LookupQuery<R>, LookupError> {
        let ctx = self.context(filter);
        let query = self.filter_by_request(&ctx, LookupQuery::new())?;
        self.handlers.sort(&ctx, query)
    }

    /// Run the lookup pipeline for one request.
    ///
    /// Filters, sorts, counts the filtered set, then fetches and renders the
    /// requested page. Any error aborts the request; no partial result is
    /// returned.
    pub async fn get_data<S>(&self, filter: &LookupFilter, source: &S) -> Result<LookupData, LookupError>
    where
        S: RecordSource<R> + ?Sized,
    {
        let ctx = self.context(filter);
        let query = self.filter_by_request(&ctx, LookupQuery::new())?;
        let query = self.handlers.sort(&ctx, query)?;

        let filtered_rows = source
            .count(&query.unpaged())
            .await
            .map_err(LookupError::Source)?;
        let query = self.handlers.paginate(&ctx, query);

        let mut data = LookupData::new(Arc::clone(&self.columns));
        data.filtered_rows = filtered_rows;

        if query.taken() == Some(0) || query.skipped() >= filtered_rows {
            debug!(
                record_type = R::type_name(),
                filtered_rows,
                skip = query.skipped(),
                "Requested page is empty, skipping fetch"
            );
            return Ok(data);
        }

        let records = source.fetch(&query).await.map_err(LookupError::Source)?;
        debug!(
            record_type = R::type_name(),
            filtered_rows,
            page = filter.page,
            rows = records.len(),
            "Fetched lookup page"
        );

        data.rows.reserve(records.len());
        for record in &records {
            data.rows.push(self.shape_row(&ctx, record)?);
        }

        Ok(data)
    }

    fn context<'a>(&'a self, filter: &'a LookupFilter) -> LookupContext<'a> {
        LookupContext {
            columns: &self.columns,
            config: &self.config,
            filter,
        }
    }

    /// Apply exactly one filter mode: id, then additional filters, then search
    fn filter_by_request(
        &self,
        ctx: &LookupContext<'_>,
        query: LookupQuery<R>,
    ) -> Result<LookupQuery<R>, LookupError> {
        if let Some(id) = ctx.filter.id.as_deref() {
            debug!(record_type = R::type_name(), id, "Filtering lookup by id");
            return self.handlers.filter_by_id(ctx, query, id);
        }

        if ctx.filter.has_active_additional_filters() {
            debug!(
                record_type = R::type_name(),
                filters = ctx.filter.active_additional_filters().count(),
                "Filtering lookup by additional filters"
            );
            return self.handlers.filter_by_additional_filters(ctx, query);
        }

        debug!(
            record_type = R::type_name(),
            search = ctx.filter.search.as_deref().unwrap_or_default(),
            "Filtering lookup by search"
        );
        self.handlers.filter_by_search(ctx, query)
    }

    fn shape_row(&self, ctx: &LookupContext<'_>, record: &R) -> Result<LookupRow, LookupError> {
        let mut row = LookupRow::with_capacity(ctx.columns.len() + 2);
        self.handlers.add_id(ctx, &mut row, record)?;
        self.handlers.add_autocomplete(ctx, &mut row, record);
        self.handlers.add_columns(ctx, &mut row, record);
        self.handlers.add_additional_data(ctx, &mut row, record);
        trace!(record_type = R::type_name(), cells = row.len(), "Shaped lookup row");
        Ok(row)
    }
}

fn check_field<R: LookupRecord>(field: &str) -> Result<(), ConfigError> {
    FieldRef::resolve::<R>(field)
        .map(|_| ())
        .ok_or_else(|| ConfigError::UnknownField {
            record_type: R::type_name().to_string(),
            field: field.to_string(),
        })
}

impl<R: LookupRecord, H: LookupHandlers<R>> std::fmt::Debug for Lookup<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup")
            .field("record_type", &R::type_name())
            .field("config", &self.config)
            .field("columns", &self.columns)
            .finish()
    }
}
