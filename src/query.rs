//! Snapshot query construction.
//!
//! A [`LookbackQuery`] is owned by the caller and immutable from the
//! executor's perspective: [`LookbackApi`](crate::client::LookbackApi)
//! renders it to a JSON body and later cross-checks the result against it,
//! but never changes it.

use serde_json::{Map, Value, json};

/// Sort direction for [`LookbackQuery::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_wire(self) -> i64 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Number of snapshots requested per page unless overridden.
pub const DEFAULT_PAGE_SIZE: u64 = 200;

/// A snapshot query against the Lookback API.
///
/// ```
/// use rally_lookback::{LookbackQuery, SortDirection};
/// use serde_json::json;
///
/// let query = LookbackQuery::new()
///     .find_clause("_TypeHierarchy", "HierarchicalRequirement")
///     .find_clause("ScheduleState", json!({"$lt": "Accepted"}))
///     .fields(["ObjectID", "ScheduleState", "PlanEstimate"])
///     .sort_by("_ValidFrom", SortDirection::Ascending)
///     .page_size(100);
/// ```
#[derive(Debug, Clone)]
pub struct LookbackQuery {
    pub(crate) find: Map<String, Value>,
    pub(crate) fields: Vec<String>,
    pub(crate) required_fields: Vec<String>,
    pub(crate) hydrate: Vec<String>,
    pub(crate) sort: Map<String, Value>,
    pub(crate) start: u64,
    pub(crate) page_size: u64,
}

impl Default for LookbackQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl LookbackQuery {
    pub fn new() -> Self {
        Self {
            find: Map::new(),
            fields: Vec::new(),
            required_fields: Vec::new(),
            hydrate: Vec::new(),
            sort: Map::new(),
            start: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Add a clause to the `find` selector. Values may be scalars or full
    /// operator objects such as `json!({"$gte": 10})`.
    pub fn find_clause(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.find.insert(field.into(), value.into());
        self
    }

    /// Request the given fields on each returned snapshot.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Request the given fields and additionally require them to be present
    /// on every returned snapshot; a missing field fails result validation.
    pub fn require_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.fields.contains(&field) {
                self.fields.push(field.clone());
            }
            self.required_fields.push(field);
        }
        self
    }

    /// Ask the server to expand object-id references on the given fields
    /// into display values.
    pub fn hydrate_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hydrate.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sort returned snapshots by `field`.
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort
            .insert(field.into(), Value::from(direction.as_wire()));
        self
    }

    /// Set the zero-based start index of the requested page.
    pub fn start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Set the page size. Defaults to [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Start index this query asks the server to honor.
    pub fn requested_start(&self) -> u64 {
        self.start
    }

    /// Page size this query asks the server to honor.
    pub fn requested_page_size(&self) -> u64 {
        self.page_size
    }

    /// Fields that must be present on every returned snapshot.
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Render the JSON request body for this query.
    pub fn request_json(&self) -> String {
        let mut body = Map::new();
        body.insert("find".to_string(), Value::Object(self.find.clone()));
        if !self.fields.is_empty() {
            body.insert("fields".to_string(), json!(self.fields));
        }
        if !self.hydrate.is_empty() {
            body.insert("hydrate".to_string(), json!(self.hydrate));
        }
        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Object(self.sort.clone()));
        }
        body.insert("start".to_string(), json!(self.start));
        body.insert("pagesize".to_string(), json!(self.page_size));
        Value::Object(body).to_string()
    }
}
