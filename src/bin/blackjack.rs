use blackjack_rs::config::{Cli, SourceKind};
use blackjack_rs::game::Game;
use blackjack_rs::tui::{app::AppState, controller, logger::TuiLogger};
use blackjack_rs::{console, engine};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::error::Error;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn source_label(cli: &Cli) -> String {
    match cli.source {
        SourceKind::Http => cli.api_url.clone(),
        SourceKind::Local => "local shuffle".to_string(),
    }
}

fn run_console(cli: &Cli, rt: &tokio::runtime::Runtime) -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let mut game = Game::new(cli.card_source()?, cli.pacer());
    let mut stdout = io::stdout();
    rt.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        console::run(&mut game, stdin, &mut stdout).await
    })?;
    Ok(())
}

fn run_tui(cli: &Cli, rt: &tokio::runtime::Runtime) -> Result<(), Box<dyn Error>> {
    let logs = TuiLogger::install()?;
    let game = Game::new(cli.card_source()?, cli.pacer());
    let handle = {
        let _guard = rt.enter();
        engine::spawn(game)
    };
    let mut app = AppState::new(handle.commands.clone(), handle.views.clone(), source_label(cli))
        .with_log_buffer(logs)
        .with_dealer_delay(cli.dealer_delay_ms);
    log::info!("blackjack-rs {} ready", blackjack_rs::VERSION);

    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(100));

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    handle.task.abort();
    res?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    if cli.console || !io::stdout().is_terminal() {
        run_console(&cli, &rt)
    } else {
        run_tui(&cli, &rt)
    }
}
