//! A card source that deals a fixed sequence, for replays and tests.

use super::{CardSource, DeckId, SourceError};
use crate::cards::{parse_cards, Card, CardParseError};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Deals cards in exactly the order given. Every new deck continues from the
/// same queue, so a script can span several rounds.
///
/// Failures can be injected by call number: `fail_shuffle` makes the next
/// deck creation fail, `fail_draw_call(n)` fails the n-th `draw` call
/// (0-based, counted over the source's lifetime).
///
/// ```
/// use blackjack_rs::source::{CardSource, ScriptedSource};
///
/// # tokio_test_block(async {
/// let src = ScriptedSource::parse("As Kd 7c 2h").unwrap();
/// let deck = src.create_shuffled_deck().await.unwrap();
/// let cards = src.draw(&deck, 2).await.unwrap();
/// assert_eq!(cards[0].to_string(), "As");
/// assert_eq!(src.remaining(), 2);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedSource {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<Card>,
    decks_created: usize,
    draw_calls: usize,
    fail_shuffle: bool,
    fail_draw_calls: Vec<usize>,
}

impl ScriptedSource {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            state: Mutex::new(State { queue: cards.into_iter().collect(), ..State::default() }),
        }
    }

    pub fn parse(cards: &str) -> Result<Self, CardParseError> {
        Ok(Self::new(parse_cards(cards)?))
    }

    pub fn fail_shuffle(self) -> Self {
        self.lock().fail_shuffle = true;
        self
    }

    pub fn fail_draw_call(self, call: usize) -> Self {
        self.lock().fail_draw_calls.push(call);
        self
    }

    pub fn remaining(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn decks_created(&self) -> usize {
        self.lock().decks_created
    }

    pub fn draw_calls(&self) -> usize {
        self.lock().draw_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CardSource for ScriptedSource {
    async fn create_shuffled_deck(&self) -> Result<DeckId, SourceError> {
        let mut st = self.lock();
        if std::mem::take(&mut st.fail_shuffle) {
            return Err(SourceError::Transport("scripted shuffle failure".into()));
        }
        st.decks_created += 1;
        Ok(DeckId::new(format!("scripted-{}", st.decks_created)))
    }

    async fn draw(&self, _deck: &DeckId, count: usize) -> Result<Vec<Card>, SourceError> {
        let mut st = self.lock();
        let call = st.draw_calls;
        st.draw_calls += 1;
        if st.fail_draw_calls.contains(&call) {
            return Err(SourceError::Status(503));
        }
        let take = count.min(st.queue.len());
        Ok(st.queue.drain(..take).collect())
    }
}
