mod app;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use menubible_core::{AssetUploader, ItemStore, Route};
use ratatui::prelude::*;
use tracing::info;

use app::BrowseApp;

use crate::backend::AppContext;
use crate::error::ToolError;

pub async fn run(ctx: AppContext, route: Route) -> Result<(), ToolError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = BrowseApp::new(
        Arc::new(ctx.store),
        Arc::new(ctx.uploader),
        ctx.gate,
        ctx.theme,
    );
    info!(%route, "Starting browser");
    app.load(route);

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<S, U>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut BrowseApp<S, U>,
) -> Result<(), ToolError>
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll with a timeout so finished requests get picked up
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        app.poll_responses();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
