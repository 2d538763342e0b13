use async_trait::async_trait;

use crate::data_models::{Card, CardImages, CardPage, CardSet, SERVER_PAGE_SIZE};
use crate::error::FetchError;

use super::CardSource;

/// Offline source for demos when the card API is unreachable.
///
/// Matches the way the hosted demo behaves: a query that hits nothing still
/// shows every demo card.
#[derive(Debug, Clone)]
pub struct DemoCards {
    cards: Vec<Card>,
}

impl Default for DemoCards {
    fn default() -> Self {
        Self {
            cards: vec![
                demo_card(
                    "demo-1",
                    "Charizard ex",
                    &["Basic", "ex"],
                    "180",
                    &["Fire"],
                    ("demo-set", "Obsidian Flames", "Scarlet & Violet"),
                    "199",
                    "Double Rare",
                    "charizard",
                ),
                demo_card(
                    "demo-2",
                    "Pikachu VMAX",
                    &["VMAX"],
                    "310",
                    &["Lightning"],
                    ("demo-set-2", "Vivid Voltage", "Sword & Shield"),
                    "188",
                    "VMAX",
                    "pikachu",
                ),
            ],
        }
    }
}

impl DemoCards {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn matches(card: &Card, query: &str) -> bool {
        let name = card.name.to_lowercase();
        let has_type = |t: &str| {
            card.types
                .as_ref()
                .is_some_and(|types| types.iter().any(|x| x == t))
        };

        name.contains(query)
            || (query.contains("fire") && has_type("Fire"))
            || (query.contains("charizard") && name.contains("charizard"))
            || (query.contains("pikachu") && name.contains("pikachu"))
            || (query.contains("lightning") && has_type("Lightning"))
    }

    pub fn search(&self, query: &str) -> Vec<Card> {
        let query = query.to_lowercase();
        let hits: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| Self::matches(c, &query))
            .cloned()
            .collect();
        if hits.is_empty() {
            self.cards.clone()
        } else {
            hits
        }
    }
}

#[async_trait]
impl CardSource for DemoCards {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<CardPage, FetchError> {
        if query.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }
        // everything fits on page one
        let data = if page <= 1 { self.search(query) } else { Vec::new() };
        let count = data.len() as u32;
        Ok(CardPage {
            data,
            page,
            page_size: SERVER_PAGE_SIZE as u32,
            count,
            total_count: count,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_card(
    id: &str,
    name: &str,
    subtypes: &[&str],
    hp: &str,
    types: &[&str],
    (set_id, set_name, series): (&str, &str, &str),
    number: &str,
    rarity: &str,
    image: &str,
) -> Card {
    let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut card = Card::new(id, name);
    card.supertype = Some("Pokémon".to_string());
    card.subtypes = Some(strings(subtypes));
    card.hp = Some(hp.to_string());
    card.types = Some(strings(types));
    card.set = Some(CardSet {
        id: set_id.to_string(),
        name: set_name.to_string(),
        series: series.to_string(),
        extra: Default::default(),
    });
    card.number = Some(number.to_string());
    card.artist = Some("Demo Artist".to_string());
    card.rarity = Some(rarity.to_string());
    card.images = Some(CardImages {
        small: format!("/demo-{image}-small.jpg"),
        large: format!("/demo-{image}-large.jpg"),
    });
    card
}
