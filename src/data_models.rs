use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Records per upstream page. The gateway always asks for this many.
pub const SERVER_PAGE_SIZE: usize = 250;

/// Records per page shown to the user.
pub const CLIENT_PAGE_SIZE: usize = 24;

/// A single trading card as returned upstream.
///
/// Only the fields worth showing in a result list are typed; everything else
/// is kept in `extra` so a card serialises back out the way it came in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<CardSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<CardImages>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Card {
        Card {
            id: id.into(),
            name: name.into(),
            supertype: None,
            subtypes: None,
            hp: None,
            types: None,
            number: None,
            artist: None,
            rarity: None,
            set: None,
            images: None,
            extra: Map::new(),
        }
    }

    pub fn set_name(&self) -> Option<&str> {
        self.set.as_ref().map(|s| s.name.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardImages {
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

/// One server page, as relayed by the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub data: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    pub count: u32,
    pub total_count: u32,
}

impl CardPage {
    /// True iff this page came back full, so another page may follow.
    pub fn is_full(&self) -> bool {
        self.data.len() == SERVER_PAGE_SIZE
    }
}

/// Body returned by the gateway for every non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> ErrorBody {
        ErrorBody {
            error: error.into(),
            details: None,
            hint: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> ErrorBody {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> ErrorBody {
        self.hint = Some(hint.into());
        self
    }
}
