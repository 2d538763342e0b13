/// Structured filters turned into the upstream `field:value` query language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub name: Option<String>,
    pub subtypes: Vec<String>,
    pub types: Vec<String>,
    pub set: Option<String>,
    pub rarity: Option<String>,
}

pub struct SearchExample {
    pub query: &'static str,
    pub description: &'static str,
}

pub const SEARCH_EXAMPLES: [SearchExample; 6] = [
    SearchExample {
        query: "name:pikachu",
        description: "Find cards with \"pikachu\" in the name",
    },
    SearchExample {
        query: "name:\"charizard ex\"",
        description: "Find exact phrase matches",
    },
    SearchExample {
        query: "name:char*",
        description: "Use wildcards for partial matches",
    },
    SearchExample {
        query: "name:charizard subtypes:vmax",
        description: "Combine multiple search criteria",
    },
    SearchExample {
        query: "types:fire rarity:rare",
        description: "Search by type and rarity",
    },
    SearchExample {
        query: "set.name:\"base set\"",
        description: "Find cards from a specific set",
    },
];

/// Multi-word values become phrases unless the caller already quoted them.
fn quote_phrase(value: &str) -> String {
    if value.contains(' ') && !value.starts_with('"') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

pub fn build_search_query(params: &SearchParams) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = params.name.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("name:{}", quote_phrase(name)));
    }
    parts.extend(params.subtypes.iter().map(|s| format!("subtypes:{s}")));
    parts.extend(params.types.iter().map(|t| format!("types:{t}")));
    if let Some(set) = params.set.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("set.name:{}", quote_phrase(set)));
    }
    if let Some(rarity) = params.rarity.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("rarity:{}", quote_phrase(rarity)));
    }

    parts.join(" ")
}
