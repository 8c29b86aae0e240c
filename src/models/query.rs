//! List query parameters for the product listing endpoint
//!
//! Raw query-string values are parsed leniently: anything that does not parse
//! falls back to its default instead of rejecting the request.

use serde::Deserialize;

/// Page used when none (or an invalid one) is given.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when none (or an invalid one) is given.
pub const DEFAULT_LIMIT: usize = 100;

/// Query string of `GET /api/products`, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Sort order requested by the caller.
///
/// Written as `field` (ascending) or `-field` (descending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// Parses `price` / `-price`. Returns None for an empty field.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// Renders the sort back into its query-string form.
    pub fn as_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Normalized list query handed to the catalog and the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: usize,
    /// Maximum number of products per page
    pub limit: usize,
    /// Case-insensitive substring filter on `category`
    pub category: Option<String>,
    /// Case-insensitive substring filter on `brand`
    pub brand: Option<String>,
    pub sort: Option<SortSpec>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            category: None,
            brand: None,
            sort: None,
        }
    }
}

impl ListQuery {
    /// Number of products skipped before the requested page.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// True when no filter, sort or non-default paging was requested.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
            category: non_empty(params.category),
            brand: non_empty(params.brand),
            sort: params.sort.as_deref().and_then(SortSpec::parse),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
