//! Client for the deckofcardsapi.com shuffle/draw protocol.

use super::{CardSource, DeckId, SourceError};
use crate::cards::{Card, Rank, Suit};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://deckofcardsapi.com/api/deck";

#[derive(Debug, Clone)]
pub struct DeckOfCardsApi {
    client: reqwest::Client,
    base_url: String,
}

impl DeckOfCardsApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn shuffle_url(&self) -> String {
        format!("{}/new/shuffle/?deck_count=1", self.base_url)
    }

    fn draw_url(&self, deck: &DeckId, count: usize) -> String {
        format!("{}/{}/draw/?count={}", self.base_url, deck, count)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        check_status(resp.status())?;
        let body = resp.text().await.map_err(|e| SourceError::Transport(e.to_string()))?;
        decode(&body)
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), SourceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SourceError::Status(status.as_u16()))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))
}

impl CardSource for DeckOfCardsApi {
    async fn create_shuffled_deck(&self) -> Result<DeckId, SourceError> {
        let resp: ShuffleResponse = self.get_json(&self.shuffle_url()).await?;
        resp.into_deck_id()
    }

    async fn draw(&self, deck: &DeckId, count: usize) -> Result<Vec<Card>, SourceError> {
        let resp: DrawResponse = self.get_json(&self.draw_url(deck, count)).await?;
        let cards = resp.into_cards()?;
        if cards.len() != count {
            return Err(SourceError::ShortDraw { requested: count, got: cards.len() });
        }
        Ok(cards)
    }
}

#[derive(Debug, Deserialize)]
struct ShuffleResponse {
    success: bool,
    deck_id: Option<String>,
    error: Option<String>,
}

impl ShuffleResponse {
    fn into_deck_id(self) -> Result<DeckId, SourceError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        self.deck_id
            .map(DeckId::new)
            .ok_or_else(|| SourceError::Malformed("missing deck_id".into()))
    }
}

#[derive(Debug, Deserialize)]
struct DrawResponse {
    success: bool,
    #[serde(default)]
    cards: Vec<WireCard>,
    error: Option<String>,
}

impl DrawResponse {
    fn into_cards(self) -> Result<Vec<Card>, SourceError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        self.cards.into_iter().map(WireCard::into_card).collect()
    }
}

#[derive(Debug, Deserialize)]
struct WireCard {
    value: String,
    suit: String,
    image: Option<String>,
}

impl WireCard {
    fn into_card(self) -> Result<Card, SourceError> {
        let rank = Rank::from_wire(&self.value);
        if rank == Rank::Unknown {
            log::warn!("unrecognised rank {:?}, scoring it as ten", self.value);
        }
        let suit: Suit = self
            .suit
            .parse()
            .map_err(|e: crate::cards::SuitParseError| SourceError::Malformed(e.to_string()))?;
        let card = Card::new(rank, suit);
        Ok(match self.image {
            Some(img) => card.with_image(img),
            None => card,
        })
    }
}

fn rejected(error: Option<String>) -> SourceError {
    SourceError::Rejected(error.unwrap_or_else(|| "success=false".into()))
}
