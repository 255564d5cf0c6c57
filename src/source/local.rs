//! In-process card source: every deck is a standard 52-card deck shuffled
//! with a ChaCha RNG. Useful offline and for reproducible sessions.

use super::{CardSource, DeckId, SourceError};
use crate::cards::Card;
use crate::deck::Deck;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct ShuffledDeckSource {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    rng: ChaCha8Rng,
    next_id: u64,
    decks: HashMap<DeckId, Deck>,
}

impl ShuffledDeckSource {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        let seed: u64 = rand::rng().random();
        Self::seeded(seed)
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self { inner: Mutex::new(Inner { rng, next_id: 0, decks: HashMap::new() }) }
    }

    /// Cards left in a deck, `None` for unknown ids.
    pub fn remaining(&self, deck: &DeckId) -> Option<usize> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.decks.get(deck).map(Deck::len)
    }
}

impl CardSource for ShuffledDeckSource {
    async fn create_shuffled_deck(&self) -> Result<DeckId, SourceError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = DeckId::new(format!("local-{}", inner.next_id));
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut inner.rng);
        inner.decks.insert(id.clone(), deck);
        Ok(id)
    }

    async fn draw(&self, deck: &DeckId, count: usize) -> Result<Vec<Card>, SourceError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let d = inner.decks.get_mut(deck).ok_or_else(|| SourceError::UnknownDeck(deck.clone()))?;
        if d.len() < count {
            return Err(SourceError::Rejected(format!(
                "not enough cards remaining to draw {count}"
            )));
        }
        Ok(d.draw_n(count))
    }
}
