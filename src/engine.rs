// Game engine API boundary. UIs (TUI, console, bots) drive a `Game` running
// in its own tokio task by sending `Command`s and watching `TableView`
// snapshots, without touching the round directly. Commands are handled one at
// a time, so a dealer loop always completes before the next command is read.

use crate::game::{Game, GameError, Phase, TableView};
use crate::pacing::Pacer;
use crate::source::CardSource;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    StartRound,
    Hit,
    Stand,
}

/// Handle to a spawned game task. Dropping every command sender stops the task.
#[derive(Debug)]
pub struct EngineHandle {
    pub commands: mpsc::UnboundedSender<Command>,
    pub views: watch::Receiver<TableView>,
    pub task: JoinHandle<()>,
}

/// Apply one command to the game.
pub async fn apply<S, P>(game: &mut Game<S, P>, cmd: Command) -> Result<Phase, GameError>
where
    S: CardSource,
    P: Pacer,
{
    match cmd {
        Command::StartRound => game.start_round().await,
        Command::Hit => game.hit().await,
        Command::Stand => game.stand().await,
    }
}

/// Move `game` into a background task on the current tokio runtime.
pub fn spawn<S, P>(game: Game<S, P>) -> EngineHandle
where
    S: CardSource + Send + Sync + 'static,
    P: Pacer + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let views = game.subscribe();
    let task = tokio::spawn(run(game, rx));
    EngineHandle { commands: tx, views, task }
}

async fn run<S, P>(mut game: Game<S, P>, mut commands: mpsc::UnboundedReceiver<Command>)
where
    S: CardSource + Send + Sync,
    P: Pacer + Send + Sync,
{
    while let Some(cmd) = commands.recv().await {
        match apply(&mut game, cmd).await {
            Ok(phase) => log::debug!("{cmd:?} -> {phase}"),
            Err(e @ GameError::InvalidPhase { .. }) => log::warn!("ignored {cmd:?}: {e}"),
            Err(e) => log::error!("{cmd:?} failed: {e}"),
        }
    }
    log::debug!("command channel closed, game task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;
    use crate::pacing::NoDelay;
    use crate::source::ScriptedSource;

    #[tokio::test]
    async fn spawned_game_processes_commands_in_order() {
        let game = Game::new(ScriptedSource::parse("Tc Kd 8h 3h 5c").unwrap(), NoDelay);
        let mut handle = spawn(game);
        assert!(handle.commands.send(Command::StartRound).is_ok());
        assert!(handle.commands.send(Command::Stand).is_ok());
        // queued after the round ends; rejected, not fatal
        assert!(handle.commands.send(Command::Hit).is_ok());

        let view = handle
            .views
            .wait_for(|v| v.phase == Phase::Finished)
            .await
            .unwrap()
            .clone();
        assert_eq!(view.outcome, Some(Outcome::Push));

        let EngineHandle { commands, task, .. } = handle;
        drop(commands);
        task.await.unwrap();
    }
}
