mod app;
mod config;
mod picker;
mod submit;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::{AppConfig, ColorMode};
use picker::{format_file_size, FileHandle, PickerPolicy};
use submit::LoggingSubmitter;

#[derive(Parser, Debug)]
#[command(name = "dropzone")]
#[command(version = "0.1.0")]
#[command(about = "Pick a CSV or JSON file of city data to upload and harmonize")]
struct Args {
    /// Start with this file selected (same rules as the browse dialog)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Check a file against the drop rules and print the verdict as JSON
    #[arg(short, long)]
    check: Option<PathBuf>,

    /// Use the light color scheme
    #[arg(long)]
    light: bool,

    /// Apply the drop type/size checks to browsed files too
    #[arg(long)]
    strict_browse: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so it stays off the alternate screen)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if args.light {
        config.color_mode = ColorMode::Light;
    }
    if args.strict_browse {
        config.strict_browse = true;
    }

    // Handle CLI-only commands
    if let Some(path) = args.check {
        return print_check(&path, &config.policy());
    }

    ui::init_theme(theme::Theme::load(&config));

    let notifications = config.notifications;
    let mut app = App::new(config, Box::new(LoggingSubmitter::new(notifications)));
    if let Some(path) = args.file {
        app.choose_path(&path)?;
    }

    run_tui(&mut app).await
}

/// Verdict of the drop-path rules for one file
fn check_report(path: &Path, policy: &PickerPolicy) -> Result<serde_json::Value> {
    let file = FileHandle::from_path(path)?;
    let verdict = policy.check(&file);

    Ok(serde_json::json!({
        "file": &file,
        "displaySize": format_file_size(file.size),
        "accepted": verdict.is_ok(),
        "reason": verdict.err().map(|r| r.to_string()),
    }))
}

fn print_check(path: &Path, policy: &PickerPolicy) -> Result<()> {
    let report = check_report(path, policy)?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

async fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        let size = terminal.size()?;
        app.area = Rect::new(0, 0, size.width, size.height);

        if event::poll(std::time::Duration::from_millis(100))? {
            // Catch errors so a failed action doesn't end the session
            let handled = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => app.handle_key(key).await,
                },
                Event::Paste(payload) => {
                    app.handle_paste(&payload);
                    Ok(())
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse).await,
                _ => Ok(()),
            };

            if let Err(e) = handled {
                tracing::warn!("Action failed: {:#}", e);
                app.status_message = Some(format!("Error: {}", e));
                app.status_message_time = Some(std::time::Instant::now());
            }
        }

        app.tick();
    }
}
