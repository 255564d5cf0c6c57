use crate::cards::Card;
use crate::hand::{Hand, Role};
use crate::pacing::{NoDelay, Pacer};
use crate::scoring::{self, BLACKJACK, DEALER_STANDS_ON};
use crate::source::{CardSource, DeckId, SourceError};
use std::fmt;
use tokio::sync::watch;

/// Cards dealt at the start of a round, alternating player/dealer.
pub const OPENING_CARDS: usize = 4;

/// Position of the dealer's hole card.
pub const HOLE_CARD: usize = 1;

pub const LOAD_FAILURE: &str = "Failed to load the game";
pub const DRAW_FAILURE: &str = "Could not draw a card, try again";
pub const SOURCE_LOST: &str = "Card source unavailable, start a new round";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Phase {
    #[default]
    Idle,
    Dealing,
    Playing,
    DealerPlay,
    Finished,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Dealing => "Dealing",
            Phase::Playing => "Playing",
            Phase::DealerPlay => "Dealer play",
            Phase::Finished => "Finished",
        }
    }

    /// A new round may be started from here.
    pub fn can_start(self) -> bool {
        matches!(self, Phase::Idle | Phase::Finished)
    }

    /// Waiting on the card source or the dealer; no input is accepted.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Dealing | Phase::DealerPlay)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a finished round was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    /// Player was dealt 21; the dealer hand is not looked at.
    Blackjack,
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Push,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Blackjack => "BLACKJACK! You win",
            Outcome::PlayerBust => "Over 21... you lose",
            Outcome::DealerBust => "You win! The dealer busted",
            Outcome::PlayerWins => "You win!",
            Outcome::DealerWins => "You lose",
            Outcome::Push => "Push",
        }
    }

    /// Winning side, `None` for a push.
    pub fn winner(self) -> Option<Role> {
        match self {
            Outcome::Blackjack | Outcome::DealerBust | Outcome::PlayerWins => Some(Role::Player),
            Outcome::PlayerBust | Outcome::DealerWins => Some(Role::Dealer),
            Outcome::Push => None,
        }
    }
}

/// Compare the player's stand total with the dealer's final total.
pub fn settle(player: u32, dealer: u32) -> Outcome {
    if dealer > BLACKJACK {
        Outcome::DealerBust
    } else if dealer > player {
        Outcome::DealerWins
    } else if dealer < player {
        Outcome::PlayerWins
    } else {
        Outcome::Push
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    StartRound,
    Hit,
    Stand,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::StartRound => "start a round",
            Action::Hit => "hit",
            Action::Stand => "stand",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("card source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("cannot {action} during {phase}")]
    InvalidPhase { action: Action, phase: Phase },
}

/// A dealer card as the player is allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSlot {
    FaceUp(Card),
    FaceDown,
}

impl CardSlot {
    pub fn card(&self) -> Option<&Card> {
        match self {
            CardSlot::FaceUp(c) => Some(c),
            CardSlot::FaceDown => None,
        }
    }
}

/// Snapshot of the table as the presentation layer may see it. While the
/// player is still deciding, the dealer's hole card is face down and the
/// dealer score counts the upcard only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    /// Number of the round this view belongs to, 0 before the first deal.
    pub round: u64,
    pub phase: Phase,
    pub player: Vec<Card>,
    pub player_score: u32,
    pub dealer: Vec<CardSlot>,
    pub dealer_score: u32,
    pub outcome: Option<Outcome>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Round {
    pub(crate) number: u64,
    pub(crate) deck: Option<DeckId>,
    pub(crate) player: Hand,
    pub(crate) dealer: Hand,
    pub(crate) phase: Phase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) message: Option<String>,
    /// Player total frozen when they stood.
    pub(crate) player_stood_at: Option<u32>,
}

impl Round {
    fn new(number: u64, phase: Phase) -> Self {
        Self {
            number,
            deck: None,
            player: Hand::new(Role::Player),
            dealer: Hand::new(Role::Dealer),
            phase,
            outcome: None,
            message: None,
            player_stood_at: None,
        }
    }

    fn hole_card_hidden(&self) -> bool {
        self.phase == Phase::Playing
    }

    fn dealer_slots(&self) -> Vec<CardSlot> {
        let hidden = self.hole_card_hidden();
        self.dealer
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if hidden && i == HOLE_CARD {
                    CardSlot::FaceDown
                } else {
                    CardSlot::FaceUp(c.clone())
                }
            })
            .collect()
    }

    fn visible_dealer_score(&self) -> u32 {
        if self.hole_card_hidden() {
            scoring::upcard_value(self.dealer.first())
        } else {
            self.dealer.value()
        }
    }

    fn view(&self) -> TableView {
        TableView {
            round: self.number,
            phase: self.phase,
            player: self.player.as_slice().to_vec(),
            player_score: self.player.value(),
            dealer: self.dealer_slots(),
            dealer_score: self.visible_dealer_score(),
            outcome: self.outcome,
            message: self.message.clone(),
        }
    }
}

/// Game controller: owns the round, talks to the card source and plays the
/// dealer.
///
/// Every state change is published to [`Game::subscribe`] receivers.
///
/// ```
/// use blackjack_rs::game::{Game, Outcome, Phase};
/// use blackjack_rs::pacing::NoDelay;
/// use blackjack_rs::source::ScriptedSource;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let source = ScriptedSource::parse("Tc Kd 8h 2h 5s").unwrap();
/// let mut game = Game::new(source, NoDelay);
/// assert_eq!(game.start_round().await.unwrap(), Phase::Playing);
/// assert_eq!(game.stand().await.unwrap(), Phase::Finished);
/// assert_eq!(game.outcome(), Some(Outcome::PlayerWins));
/// # });
/// ```
#[derive(Debug)]
pub struct Game<S, P = NoDelay> {
    source: S,
    pacer: P,
    round: Round,
    views: watch::Sender<TableView>,
}

impl<S: CardSource, P: Pacer> Game<S, P> {
    pub fn new(source: S, pacer: P) -> Self {
        let round = Round::new(0, Phase::Idle);
        let (views, _) = watch::channel(round.view());
        Self { source, pacer, round, views }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    /// Rounds started so far, counting ones that failed to deal.
    pub fn round_number(&self) -> u64 {
        self.round.number
    }

    pub fn player_hand(&self) -> &Hand {
        &self.round.player
    }

    pub fn player_score(&self) -> u32 {
        self.round.player.value()
    }

    /// Dealer cards with the hole card masked while the player acts.
    pub fn dealer_hand(&self) -> Vec<CardSlot> {
        self.round.dealer_slots()
    }

    pub fn dealer_score(&self) -> u32 {
        self.round.visible_dealer_score()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.round.outcome
    }

    /// Outcome text of a finished round, or the last failure notice.
    pub fn outcome_message(&self) -> Option<&str> {
        self.round.message.as_deref()
    }

    pub fn deck_id(&self) -> Option<&DeckId> {
        self.round.deck.as_ref()
    }

    pub fn view(&self) -> TableView {
        self.round.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<TableView> {
        self.views.subscribe()
    }

    fn publish(&self) {
        self.views.send_replace(self.round.view());
    }

    fn require(&self, action: Action, allowed: bool) -> Result<(), GameError> {
        if allowed {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { action, phase: self.round.phase })
        }
    }

    /// Shuffle a fresh deck and deal two cards each, player first.
    ///
    /// A dealt 21 ends the round immediately as a player blackjack. If the
    /// card source fails the table goes back to `Idle` with nothing dealt.
    pub async fn start_round(&mut self) -> Result<Phase, GameError> {
        self.require(Action::StartRound, self.round.phase.can_start())?;
        let number = self.round.number + 1;
        self.round = Round::new(number, Phase::Dealing);
        self.publish();
        log::info!("dealing round {number}");

        let (deck, cards) = match self.deal_opening().await {
            Ok(dealt) => dealt,
            Err(e) => {
                log::warn!("could not deal: {e}");
                self.round = Round::new(number, Phase::Idle);
                self.round.message = Some(LOAD_FAILURE.to_string());
                self.publish();
                return Err(e.into());
            }
        };

        self.round.deck = Some(deck);
        for (i, card) in cards.into_iter().enumerate() {
            if i % 2 == 0 {
                self.round.player.push(card);
            } else {
                self.round.dealer.push(card);
            }
        }
        log::debug!("player {} / dealer upcard {:?}", self.round.player, self.round.dealer.first());

        if self.round.player.is_natural() {
            self.finish(Outcome::Blackjack);
        } else {
            self.round.phase = Phase::Playing;
            self.publish();
        }
        Ok(self.round.phase)
    }

    /// Draw one card for the player. Going over 21 ends the round; reaching
    /// exactly 21 does not stand automatically.
    pub async fn hit(&mut self) -> Result<Phase, GameError> {
        self.require(Action::Hit, self.round.phase == Phase::Playing)?;
        self.round.message = None;

        match self.draw_one().await {
            Ok(card) => {
                log::debug!("player draws {card}");
                self.round.player.push(card);
            }
            Err(e) => {
                log::warn!("hit failed, hand unchanged: {e}");
                self.round.message = Some(DRAW_FAILURE.to_string());
                self.publish();
                return Err(e.into());
            }
        }

        if self.round.player.is_bust() {
            self.finish(Outcome::PlayerBust);
        } else {
            self.publish();
        }
        Ok(self.round.phase)
    }

    /// Freeze the player's total and let the dealer draw to 17 or more.
    ///
    /// The dealer loop runs to completion. A card source failure abandons the
    /// round: it finishes with no outcome.
    pub async fn stand(&mut self) -> Result<Phase, GameError> {
        self.require(Action::Stand, self.round.phase == Phase::Playing)?;
        let player = self.round.player.value();
        self.round.player_stood_at = Some(player);
        self.round.message = None;
        self.round.phase = Phase::DealerPlay;
        self.publish();
        log::info!("player stands on {player}");

        while self.round.dealer.value() < DEALER_STANDS_ON {
            match self.draw_one().await {
                Ok(card) => {
                    log::debug!("dealer draws {card}");
                    self.round.dealer.push(card);
                    self.publish();
                }
                Err(e) => {
                    log::warn!("dealer could not draw, abandoning round: {e}");
                    self.round.phase = Phase::Finished;
                    self.round.message = Some(SOURCE_LOST.to_string());
                    self.publish();
                    return Err(e.into());
                }
            }
            self.pacer.pause().await;
        }

        self.finish(settle(player, self.round.dealer.value()));
        Ok(self.round.phase)
    }

    fn finish(&mut self, outcome: Outcome) {
        log::info!(
            "round over: {:?} (player {}, dealer {})",
            outcome,
            self.round.player.value(),
            self.round.dealer.value()
        );
        self.round.phase = Phase::Finished;
        self.round.outcome = Some(outcome);
        self.round.message = Some(outcome.message().to_string());
        self.publish();
    }

    async fn deal_opening(&self) -> Result<(DeckId, Vec<Card>), SourceError> {
        let deck = self.source.create_shuffled_deck().await?;
        log::debug!("shuffled deck {deck}");
        let cards = self.draw_exact(&deck, OPENING_CARDS).await?;
        Ok((deck, cards))
    }

    async fn draw_one(&self) -> Result<Card, SourceError> {
        let deck = self
            .round
            .deck
            .as_ref()
            .ok_or_else(|| SourceError::Rejected("no deck for this round".into()))?;
        let mut cards = self.draw_exact(deck, 1).await?;
        cards.pop().ok_or(SourceError::ShortDraw { requested: 1, got: 0 })
    }

    async fn draw_exact(&self, deck: &DeckId, count: usize) -> Result<Vec<Card>, SourceError> {
        let cards = self.source.draw(deck, count).await?;
        if cards.len() != count {
            return Err(SourceError::ShortDraw { requested: count, got: cards.len() });
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::source::ScriptedSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPacer(AtomicUsize);

    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn game(script: &str) -> Game<ScriptedSource, CountingPacer> {
        Game::new(ScriptedSource::parse(script).unwrap(), CountingPacer::default())
    }

    #[tokio::test]
    async fn deal_alternates_starting_with_player() {
        let mut g = game("As Kd 7c 2h");
        assert_eq!(g.start_round().await.unwrap(), Phase::Playing);
        assert_eq!(g.round.player.as_slice(), parse_cards("As 7c").unwrap().as_slice());
        assert_eq!(g.round.dealer.as_slice(), parse_cards("Kd 2h").unwrap().as_slice());
        assert_eq!(g.player_score(), 18);
        assert_eq!(g.round.dealer.value(), 12);
        assert!(g.outcome_message().is_none());
    }

    #[tokio::test]
    async fn hole_card_hidden_while_playing() {
        let mut g = game("As Kd 7c 2h 5s");
        g.start_round().await.unwrap();
        let slots = g.dealer_hand();
        assert_eq!(slots.len(), 2);
        assert!(matches!(&slots[0], CardSlot::FaceUp(c) if c.to_string() == "Kd"));
        assert_eq!(slots[1], CardSlot::FaceDown);
        assert_eq!(g.dealer_score(), 10);
        assert_eq!(g.view().dealer_score, 10);

        g.stand().await.unwrap();
        assert!(g.dealer_hand().iter().all(|s| s.card().is_some()));
        assert_eq!(g.dealer_score(), 17);
    }

    #[tokio::test]
    async fn natural_21_wins_without_dealer_play() {
        let mut g = game("As 5c Kd 5h");
        assert_eq!(g.start_round().await.unwrap(), Phase::Finished);
        assert_eq!(g.outcome(), Some(Outcome::Blackjack));
        assert_eq!(g.outcome_message(), Some(Outcome::Blackjack.message()));
        assert_eq!(g.round.dealer.len(), 2);
        assert_eq!(g.source().draw_calls(), 1);
    }

    #[tokio::test]
    async fn dealer_blackjack_is_not_checked() {
        let mut g = game("Tc As 8h Kd");
        assert_eq!(g.start_round().await.unwrap(), Phase::Playing);
        assert_eq!(g.round.dealer.value(), 21);
        assert!(g.outcome().is_none());
    }

    #[tokio::test]
    async fn hit_past_21_busts() {
        let mut g = game("9c Kd 6h 2h 9s");
        g.start_round().await.unwrap();
        assert_eq!(g.player_score(), 15);
        assert_eq!(g.hit().await.unwrap(), Phase::Finished);
        assert_eq!(g.player_score(), 24);
        assert_eq!(g.outcome(), Some(Outcome::PlayerBust));
        let err = g.hit().await.unwrap_err();
        assert_eq!(err, GameError::InvalidPhase { action: Action::Hit, phase: Phase::Finished });
    }

    #[tokio::test]
    async fn hitting_to_21_keeps_playing() {
        let mut g = game("9c Kd 6h 2h 6s");
        g.start_round().await.unwrap();
        assert_eq!(g.hit().await.unwrap(), Phase::Playing);
        assert_eq!(g.player_score(), 21);
    }

    #[tokio::test]
    async fn dealer_stops_once_at_17() {
        let mut g = game("Tc Kd 8h 2h 5s 6d");
        g.start_round().await.unwrap();
        g.stand().await.unwrap();
        assert_eq!(g.round.dealer.value(), 17);
        assert_eq!(g.round.dealer.len(), 3);
        assert_eq!(g.source().remaining(), 1);
        assert_eq!(g.pacer.0.load(Ordering::SeqCst), 1);
        assert_eq!(g.outcome(), Some(Outcome::PlayerWins));
    }

    #[tokio::test]
    async fn dealer_draws_until_17() {
        let mut g = game("Tc Kd 8h 2h 2c 3d 9s");
        g.start_round().await.unwrap();
        g.stand().await.unwrap();
        assert_eq!(g.round.dealer.value(), 17);
        assert_eq!(g.round.dealer.len(), 4);
        assert_eq!(g.source().remaining(), 1);
        assert_eq!(g.pacer.0.load(Ordering::SeqCst), 2);
        assert_eq!(g.round.player_stood_at, Some(18));
    }

    #[tokio::test]
    async fn soft_17_stands() {
        let mut g = game("Tc As 6h 6d 5c");
        g.start_round().await.unwrap();
        g.stand().await.unwrap();
        assert_eq!(g.round.dealer.len(), 2);
        assert_eq!(g.outcome(), Some(Outcome::DealerWins));
    }

    #[tokio::test]
    async fn equal_totals_push() {
        let mut g = game("Tc Kd 8h 3h 5c");
        g.start_round().await.unwrap();
        g.stand().await.unwrap();
        assert_eq!(g.outcome(), Some(Outcome::Push));
        assert_eq!(g.outcome().and_then(Outcome::winner), None);
    }

    #[tokio::test]
    async fn dealer_bust_pays_player() {
        let mut g = game("Tc Kd 2h 6h Ks");
        g.start_round().await.unwrap();
        g.stand().await.unwrap();
        assert_eq!(g.round.dealer.value(), 26);
        assert_eq!(g.outcome(), Some(Outcome::DealerBust));
    }

    #[test]
    fn settle_compares_totals() {
        assert_eq!(settle(18, 22), Outcome::DealerBust);
        assert_eq!(settle(18, 19), Outcome::DealerWins);
        assert_eq!(settle(18, 17), Outcome::PlayerWins);
        assert_eq!(settle(18, 18), Outcome::Push);
    }

    #[tokio::test]
    async fn shuffle_failure_returns_to_idle() {
        let src = ScriptedSource::parse("As Kd 7c 2h").unwrap().fail_shuffle();
        let mut g = Game::new(src, NoDelay);
        let err = g.start_round().await.unwrap_err();
        assert!(matches!(err, GameError::SourceUnavailable(_)));
        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(g.outcome_message(), Some(LOAD_FAILURE));
        assert!(g.player_hand().is_empty());
        assert!(g.deck_id().is_none());
        assert_eq!(g.view().round, 1);

        assert_eq!(g.start_round().await.unwrap(), Phase::Playing);
        assert_eq!(g.round_number(), 2);
        assert!(g.outcome_message().is_none());
    }

    #[tokio::test]
    async fn short_deal_never_half_starts() {
        let mut g = game("As Kd 7c");
        assert!(g.start_round().await.is_err());
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.round.player.is_empty() && g.round.dealer.is_empty());
    }

    #[tokio::test]
    async fn failed_hit_keeps_playing() {
        let src = ScriptedSource::parse("9c Kd 6h 2h 3s").unwrap().fail_draw_call(1);
        let mut g = Game::new(src, NoDelay);
        g.start_round().await.unwrap();
        assert!(g.hit().await.is_err());
        assert_eq!(g.phase(), Phase::Playing);
        assert_eq!(g.player_hand().len(), 2);
        assert_eq!(g.outcome_message(), Some(DRAW_FAILURE));

        assert_eq!(g.hit().await.unwrap(), Phase::Playing);
        assert_eq!(g.player_score(), 18);
        assert!(g.outcome_message().is_none());
    }

    #[tokio::test]
    async fn failed_dealer_draw_abandons_round() {
        let src = ScriptedSource::parse("Tc Kd 8h 2h 5s").unwrap().fail_draw_call(1);
        let mut g = Game::new(src, NoDelay);
        g.start_round().await.unwrap();
        assert!(g.stand().await.is_err());
        assert_eq!(g.phase(), Phase::Finished);
        assert!(g.outcome().is_none());
        assert_eq!(g.outcome_message(), Some(SOURCE_LOST));
    }

    #[tokio::test]
    async fn actions_are_phase_gated() {
        let mut g = game("Tc Kd 8h 2h 5s");
        assert!(matches!(g.hit().await, Err(GameError::InvalidPhase { .. })));
        assert!(matches!(g.stand().await, Err(GameError::InvalidPhase { .. })));
        g.start_round().await.unwrap();
        let err = g.start_round().await.unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidPhase { action: Action::StartRound, phase: Phase::Playing }
        );
        assert_eq!(err.to_string(), "cannot start a round during Playing");
    }

    #[tokio::test]
    async fn new_round_discards_previous() {
        let mut g = game("As 5c Kd 5h 9c Kd 6h 2h");
        g.start_round().await.unwrap();
        assert_eq!(g.deck_id().map(DeckId::as_str), Some("scripted-1"));
        assert_eq!(g.start_round().await.unwrap(), Phase::Playing);
        assert_eq!(g.deck_id().map(DeckId::as_str), Some("scripted-2"));
        assert_eq!(g.round_number(), 2);
        assert_eq!(g.view().round, 2);
        assert!(g.outcome().is_none());
        assert_eq!(g.player_score(), 15);
        assert!(g.round.player_stood_at.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_latest_view() {
        let mut g = game("Tc Kd 8h 2h 5s");
        let rx = g.subscribe();
        assert_eq!(rx.borrow().phase, Phase::Idle);
        g.start_round().await.unwrap();
        assert_eq!(rx.borrow().dealer[1], CardSlot::FaceDown);
        g.stand().await.unwrap();
        let view = rx.borrow().clone();
        assert_eq!(view, g.view());
        assert_eq!(view.phase, Phase::Finished);
        assert_eq!(view.dealer.len(), 3);
        assert_eq!(view.message.as_deref(), Some("You win!"));
    }
}
