//! Command-line and environment configuration for the binary.

use crate::pacing::FixedDelay;
use crate::source::http::{DeckOfCardsApi, DEFAULT_BASE_URL};
use crate::source::{AnySource, ShuffledDeckSource, SourceError};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Remote deckofcardsapi-compatible service
    Http,
    /// In-process shuffled decks, no network
    Local,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "blackjack-rs", version, about = "Blackjack against an automated dealer")]
pub struct Cli {
    /// Where cards come from
    #[arg(long, env = "BLACKJACK_SOURCE", value_enum, default_value_t = SourceKind::Http)]
    pub source: SourceKind,

    /// Base URL of the deck service
    #[arg(long, env = "DECK_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "DECK_API_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Pause between dealer draws, in milliseconds
    #[arg(long, env = "DEALER_DELAY_MS", default_value_t = 600)]
    pub dealer_delay_ms: u64,

    /// Seed for the local source (random when omitted)
    #[arg(long, env = "BLACKJACK_SEED")]
    pub seed: Option<u64>,

    /// Line-oriented console instead of the TUI
    #[arg(long)]
    pub console: bool,
}

impl Cli {
    pub fn pacer(&self) -> FixedDelay {
        FixedDelay::from_millis(self.dealer_delay_ms)
    }

    pub fn card_source(&self) -> Result<AnySource, SourceError> {
        Ok(match self.source {
            SourceKind::Http => {
                DeckOfCardsApi::new(&self.api_url, Duration::from_secs(self.timeout_secs))?.into()
            }
            SourceKind::Local => match self.seed {
                Some(seed) => ShuffledDeckSource::seeded(seed).into(),
                None => ShuffledDeckSource::from_entropy().into(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_public_api() {
        let cli = Cli::try_parse_from(["blackjack-rs"]).unwrap();
        assert_eq!(cli.source, SourceKind::Http);
        assert_eq!(cli.api_url, DEFAULT_BASE_URL);
        assert_eq!(cli.dealer_delay_ms, 600);
        assert!(!cli.console);
    }

    #[test]
    fn local_source_with_seed() {
        let cli = Cli::try_parse_from([
            "blackjack-rs",
            "--source",
            "local",
            "--seed",
            "7",
            "--dealer-delay-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.pacer().0, Duration::ZERO);
        assert!(matches!(cli.card_source().unwrap(), AnySource::Local(_)));
    }

    #[test]
    fn rejects_unknown_source() {
        assert!(Cli::try_parse_from(["blackjack-rs", "--source", "carrier-pigeon"]).is_err());
    }
}
