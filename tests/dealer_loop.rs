use blackjack_rs::game::{Game, Outcome, Phase};
use blackjack_rs::pacing::FixedDelay;
use blackjack_rs::source::ScriptedSource;
use std::time::Duration;
use tokio::time::Instant;

// Opening deal gives the player Tc 8h (18) and the dealer Kd 2h (12).
const OPENING_18_VS_12: &str = "Tc Kd 8h 2h";

fn game_with(extra: &str) -> Game<ScriptedSource, FixedDelay> {
    let script = format!("{OPENING_18_VS_12} {extra}");
    Game::new(ScriptedSource::parse(&script).unwrap(), FixedDelay(Duration::ZERO))
}

#[tokio::test]
async fn stops_as_soon_as_17_is_reached() {
    let mut g = game_with("5s 6d");
    g.start_round().await.unwrap();
    g.stand().await.unwrap();
    assert_eq!(g.dealer_score(), 17);
    assert_eq!(g.dealer_hand().len(), 3);
    // the 6 is never drawn
    assert_eq!(g.source().remaining(), 1);
    assert_eq!(g.outcome(), Some(Outcome::PlayerWins));
}

#[tokio::test]
async fn keeps_drawing_below_17() {
    let mut g = game_with("2c 3d 9s");
    g.start_round().await.unwrap();
    g.stand().await.unwrap();
    assert_eq!(g.dealer_score(), 17);
    assert_eq!(g.dealer_hand().len(), 4);
    assert_eq!(g.source().remaining(), 1);
}

#[tokio::test]
async fn tie_at_18_is_a_push() {
    let mut g = game_with("6s");
    g.start_round().await.unwrap();
    g.stand().await.unwrap();
    assert_eq!(g.player_score(), 18);
    assert_eq!(g.dealer_score(), 18);
    assert_eq!(g.outcome(), Some(Outcome::Push));
    assert_eq!(g.outcome_message(), Some("Push"));
}

#[tokio::test]
async fn dealer_bust_beats_any_player_total() {
    let mut g = game_with("4s Kc");
    g.start_round().await.unwrap();
    g.stand().await.unwrap();
    assert_eq!(g.dealer_score(), 26);
    assert_eq!(g.outcome(), Some(Outcome::DealerBust));
}

#[tokio::test]
async fn soft_hands_count_toward_17() {
    // dealer 12 + A = 13 (ace softened), + 4 = 17
    let mut g = game_with("As 4c 9d");
    g.start_round().await.unwrap();
    g.stand().await.unwrap();
    assert_eq!(g.dealer_score(), 17);
    assert_eq!(g.dealer_hand().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn dealer_pace_waits_once_per_card() {
    let script = format!("{OPENING_18_VS_12} 2c 3d");
    let mut g = Game::new(ScriptedSource::parse(&script).unwrap(), FixedDelay::from_millis(600));
    g.start_round().await.unwrap();
    let start = Instant::now();
    assert_eq!(g.stand().await.unwrap(), Phase::Finished);
    assert!(start.elapsed() >= Duration::from_millis(1200));
    assert!(start.elapsed() < Duration::from_millis(1800));
}
