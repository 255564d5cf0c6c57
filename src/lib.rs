//! blackjack-rs: single-player blackjack against an automated dealer
//!
//! Goals:
//! - Cards come from a shuffle/draw service behind the [`source::CardSource`] trait
//! - One controller ([`game::Game`]) owns the round and every state change
//! - Scoring is a pure function; the dealer loop is a plain async loop
//!
//! ## Quick start: score a hand
//! ```
//! use blackjack_rs::cards::parse_cards;
//! use blackjack_rs::scoring::hand_value;
//!
//! let hand = parse_cards("As Ad 9c").unwrap();
//! assert_eq!(hand_value(&hand), 21);
//! ```
//!
//! ## Quick start: play a scripted round
//! ```
//! use blackjack_rs::game::{Game, Outcome};
//! use blackjack_rs::pacing::NoDelay;
//! use blackjack_rs::source::ScriptedSource;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! // player gets Tc 8h, dealer Kd 3h, then draws 5c
//! let mut game = Game::new(ScriptedSource::parse("Tc Kd 8h 3h 5c").unwrap(), NoDelay);
//! game.start_round().await.unwrap();
//! game.stand().await.unwrap();
//! assert_eq!(game.outcome(), Some(Outcome::Push));
//! # });
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin blackjack-rs -- --source local
//! ```

pub mod cards;
pub mod config;
pub mod console;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod pacing;
pub mod scoring;
pub mod source;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
