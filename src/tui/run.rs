//! Terminal setup and teardown around the phone entry app.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::config::WidgetConfig;
use crate::tui::app::PhoneInputApp;
use crate::tui::enums::LoopControl;

/// Initialise and run the phone entry terminal user interface.
///
/// Returns the full number when the user confirms with Enter, `None` when
/// they quit.
pub fn run_tui(config: &WidgetConfig) -> io::Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = PhoneInputApp::new(config);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let control = result?;
    info!(?control, "phone entry closed");
    Ok((control == LoopControl::Confirm).then(|| app.full_number()))
}
