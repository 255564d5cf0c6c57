//! Card sources: services that shuffle a fresh deck and deal cards from it.
//!
//! The game only sees the [`CardSource`] trait. Each call is a single
//! asynchronous request; a failure of any kind surfaces as a [`SourceError`].

use crate::cards::Card;
use std::fmt;
use std::future::Future;

pub mod http;
pub mod local;
pub mod scripted;

pub use http::DeckOfCardsApi;
pub use local::ShuffledDeckSource;
pub use scripted::ScriptedSource;

/// Identifier of a shuffled deck held by a card source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckId(String);

impl DeckId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("card source answered with HTTP status {0}")]
    Status(u16),
    #[error("card source rejected the request: {0}")]
    Rejected(String),
    #[error("malformed card source response: {0}")]
    Malformed(String),
    #[error("unknown deck: {0}")]
    UnknownDeck(DeckId),
    #[error("asked for {requested} cards, got {got}")]
    ShortDraw { requested: usize, got: usize },
}

/// Shuffle/draw service contract.
///
/// `draw` must return exactly `count` cards in draw order; callers treat a
/// shorter answer as a failure.
pub trait CardSource {
    fn create_shuffled_deck(&self) -> impl Future<Output = Result<DeckId, SourceError>> + Send;

    fn draw(
        &self,
        deck: &DeckId,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Card>, SourceError>> + Send;
}

/// Source selected at runtime by the binary.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySource {
    Http(DeckOfCardsApi),
    Local(ShuffledDeckSource),
}

impl CardSource for AnySource {
    async fn create_shuffled_deck(&self) -> Result<DeckId, SourceError> {
        match self {
            AnySource::Http(s) => s.create_shuffled_deck().await,
            AnySource::Local(s) => s.create_shuffled_deck().await,
        }
    }

    async fn draw(&self, deck: &DeckId, count: usize) -> Result<Vec<Card>, SourceError> {
        match self {
            AnySource::Http(s) => s.draw(deck, count).await,
            AnySource::Local(s) => s.draw(deck, count).await,
        }
    }
}

impl From<DeckOfCardsApi> for AnySource {
    fn from(s: DeckOfCardsApi) -> Self {
        AnySource::Http(s)
    }
}

impl From<ShuffledDeckSource> for AnySource {
    fn from(s: ShuffledDeckSource) -> Self {
        AnySource::Local(s)
    }
}
