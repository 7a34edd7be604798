//! Terminal dashboard for smartbin that shows live fill levels of monitored waste bins.

mod app;
mod cli;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use smartbin_provider_http as http;

use crate::app::App;
use crate::cli::Args;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_path(), args.log_level)?;

    // HTTP + service setup
    let config = args.monitor_config();
    let client = Client::builder()
        .user_agent(concat!("smartbin/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let service = Arc::new(http::service(client, config.endpoint));
    tracing::info!(
        source = service.source(),
        interval = ?config.poll_interval,
        "starting smartbin-tui"
    );

    // App state
    let mut app = App::new(service, config.poll_interval);
    app.navigate(args.route);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "smartbin-tui exited with an error");
    }
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Pick up finished polls, then draw
        app.refresh();
        app.on_tick();
        let mut scroll_limit = 0;
        terminal.draw(|frame| scroll_limit = ui::draw(frame, &app))?;
        app.set_scroll_limit(scroll_limit);

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Navigate(route) => app.navigate(route),
            }
        }
    }

    Ok(())
}
