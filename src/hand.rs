use crate::cards::{parse_cards, Card, CardParseError};
use crate::scoring::{self, HandTotal};
use std::fmt;
use std::str::FromStr;

/// Which side of the table a hand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Dealer,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Dealer => "Dealer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cards held by one participant, in the order they were dealt.
///
/// Order never changes the score, but for the dealer it decides which card
/// is the hole card (the second one).
///
/// ```
/// use blackjack_rs::hand::{Hand, Role};
///
/// let hand: Hand = "As 7c".parse().unwrap();
/// assert_eq!(hand.role(), Role::Player);
/// assert_eq!(hand.value(), 18);
/// assert!(hand.total().soft);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    role: Role,
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(role: Role) -> Self {
        Self { role, cards: Vec::new() }
    }

    pub fn with_cards(role: Role, cards: Vec<Card>) -> Self {
        Self { role, cards }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn value(&self) -> u32 {
        scoring::hand_value(&self.cards)
    }

    pub fn total(&self) -> HandTotal {
        scoring::evaluate(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.total().is_bust()
    }

    /// Two-card 21.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.value() == scoring::BLACKJACK
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Parses a player hand, e.g. `"As 7c"`.
impl FromStr for Hand {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Hand::with_cards(Role::Player, parse_cards(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn push_keeps_draw_order() {
        let mut h = Hand::new(Role::Dealer);
        assert!(h.is_empty());
        assert_eq!(h.value(), 0);
        h.push(Card::new(Rank::King, Suit::Hearts));
        assert_eq!(h.len(), 1);
        h.push(Card::new(Rank::Two, Suit::Clubs));
        assert_eq!(h.first().map(|c| c.rank()), Some(Rank::King));
        assert_eq!(h.to_string(), "Kh 2c");
        assert_eq!(h.role(), Role::Dealer);
    }

    #[test]
    fn natural_requires_two_cards() {
        let h: Hand = "As Kd".parse().unwrap();
        assert!(h.is_natural());
        let h: Hand = "7s 4d Kc".parse().unwrap();
        assert_eq!(h.value(), 21);
        assert!(!h.is_natural());
    }

    #[test]
    fn bust_and_display() {
        let h: Hand = "Kd Qc 5h".parse().unwrap();
        assert!(h.is_bust());
        // the ace drops to one instead of busting
        let soft: Hand = "As Kd 5c".parse().unwrap();
        assert_eq!(soft.total(), HandTotal { total: 16, soft: false });
        assert!(!soft.is_bust());
        assert_eq!(h.to_string(), "Kd Qc 5h");
    }
}
