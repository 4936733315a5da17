//! Path and query-string helpers for the operation wrappers.

use url::form_urlencoded;

/// Pagination for list and search operations.
///
/// `page` is 1-indexed; `0` asks for everything. `per_page` of `0` leaves the
/// page size to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOpts {
    pub page: u32,
    pub per_page: u32,
}

impl ListOpts {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// `page`/`limit` pairs; zero values are omitted.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page > 0 {
            pairs.push(("limit", self.per_page.to_string()));
        }
        pairs
    }
}

/// Append a form-encoded query string to `path`. No `?` is added when there
/// are no pairs.
pub fn with_query<'a, I>(path: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(pairs);
    let query = serializer.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Path for a list/search endpoint: optional search term first, then
/// pagination.
pub fn list_path(path: &str, search: Option<(&str, &str)>, opts: Option<&ListOpts>) -> String {
    let paging = opts.map(ListOpts::pairs).unwrap_or_default();
    let pairs = search
        .into_iter()
        .chain(paging.iter().map(|(key, value)| (*key, value.as_str())));
    with_query(path, pairs)
}

/// Percent-encode free text for use as a single path segment.
pub fn encode_segment(segment: &str) -> String {
    // form encoding turns spaces into '+', which a path would keep literally
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
