//! Hand scoring under the flexible-ace rule.
//!
//! Every ace counts 11 until the total would bust; then aces drop to 1, one at
//! a time, until the total is 21 or less or no eleven-valued ace remains.

use crate::cards::{Card, Rank};

pub const BLACKJACK: u32 = 21;

/// Dealer keeps drawing while below this total. Soft and hard totals are
/// treated alike.
pub const DEALER_STANDS_ON: u32 = 17;

/// Counted value of a single card with aces high.
///
/// ```
/// use blackjack_rs::cards::{Card, Rank, Suit};
/// use blackjack_rs::scoring::card_value;
///
/// assert_eq!(card_value(&Card::new(Rank::Ace, Suit::Clubs)), 11);
/// assert_eq!(card_value(&Card::new(Rank::Queen, Suit::Clubs)), 10);
/// assert_eq!(card_value(&Card::new(Rank::Seven, Suit::Clubs)), 7);
/// ```
pub fn card_value(card: &Card) -> u32 {
    match card.rank() {
        Rank::Ace => 11,
        Rank::King | Rank::Queen | Rank::Jack => 10,
        r => r.pips().map_or(10, u32::from),
    }
}

/// Value of a possibly missing card; a missing card counts 0.
pub fn upcard_value(card: Option<&Card>) -> u32 {
    card.map_or(0, card_value)
}

/// Total plus whether an ace is still counted as eleven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandTotal {
    pub total: u32,
    pub soft: bool,
}

impl HandTotal {
    pub const fn is_bust(self) -> bool {
        self.total > BLACKJACK
    }
}

pub fn evaluate(cards: &[Card]) -> HandTotal {
    let mut total: u32 = cards.iter().map(card_value).sum();
    let mut hard_aces = cards.iter().filter(|c| c.rank().is_ace()).count();
    while total > BLACKJACK && hard_aces > 0 {
        total -= 10;
        hard_aces -= 1;
    }
    HandTotal { total, soft: hard_aces > 0 }
}

/// Best total for the cards; empty input scores 0.
///
/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::scoring::hand_value;
///
/// assert_eq!(hand_value(&parse_cards("As Ad 9c").unwrap()), 21);
/// assert_eq!(hand_value(&[]), 0);
/// ```
pub fn hand_value(cards: &[Card]) -> u32 {
    evaluate(cards).total
}
