//! Line-oriented play for pipes and dumb terminals.

use crate::engine::{self, Command};
use crate::game::{CardSlot, Game, TableView};
use crate::pacing::Pacer;
use crate::source::CardSource;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "commands: [d]eal  [h]it  [s]tand  [?] help  [q]uit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Game(Command),
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "d" | "deal" | "n" | "new" => Some(Input::Game(Command::StartRound)),
        "h" | "hit" => Some(Input::Game(Command::Hit)),
        "s" | "stand" => Some(Input::Game(Command::Stand)),
        "?" | "help" => Some(Input::Help),
        "q" | "quit" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

/// Write the table the way a player sees it.
pub fn render<W: Write>(out: &mut W, view: &TableView) -> io::Result<()> {
    let dealer: Vec<String> = view
        .dealer
        .iter()
        .map(|slot| match slot {
            CardSlot::FaceUp(c) => c.to_string(),
            CardSlot::FaceDown => "??".to_string(),
        })
        .collect();
    let player: Vec<String> = view.player.iter().map(ToString::to_string).collect();
    writeln!(out, "[{}]", view.phase)?;
    writeln!(out, "Dealer: {:<16} ({})", dealer.join(" "), view.dealer_score)?;
    writeln!(out, "You:    {:<16} ({})", player.join(" "), view.player_score)?;
    if let Some(msg) = &view.message {
        writeln!(out, ">> {msg}")?;
    }
    Ok(())
}

/// Read commands line by line until `quit` or end of input.
pub async fn run<S, P, R, W>(game: &mut Game<S, P>, input: R, out: &mut W) -> io::Result<()>
where
    S: CardSource,
    P: Pacer,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{HELP}")?;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match parse_input(&line) {
            Some(Input::Game(cmd)) => cmd,
            Some(Input::Help) => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Some(Input::Quit) => break,
            None => {
                writeln!(out, "unknown command {:?}, type ? for help", line.trim())?;
                continue;
            }
        };
        if let Err(e) = engine::apply(game, cmd).await {
            writeln!(out, "! {e}")?;
        }
        render(out, &game.view())?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(parse_input("D"), Some(Input::Game(Command::StartRound)));
        assert_eq!(parse_input(" stand "), Some(Input::Game(Command::Stand)));
        assert_eq!(parse_input("hit"), Some(Input::Game(Command::Hit)));
        assert_eq!(parse_input("quit"), Some(Input::Quit));
        assert_eq!(parse_input("fold"), None);
    }
}
