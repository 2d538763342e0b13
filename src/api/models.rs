use serde::Deserialize;

pub const MISSING_QUERY_ERROR: &str =
    "Query parameter \"q\" is required and must be at least 1 character long.";
pub const MISSING_QUERY_HINT: &str = "Try searching for: name:pikachu or name:\"charizard ex\"";
pub const INTERNAL_ERROR: &str = "Internal server error occurred while fetching cards.";

#[derive(Debug, Deserialize)]
pub struct CardsQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl CardsQuery {
    /// Server page to fetch; absent means 1.
    pub fn page(&self) -> Option<u32> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Some(1),
            Some(raw) => raw.parse().ok().filter(|p| *p >= 1),
        }
    }
}
