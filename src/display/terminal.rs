use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

use crate::color::{lerp_color, ScopePalette};
use crate::config::Config;
use crate::display::MarkerLayer;
use crate::ipc::IpcCommand;
use crate::radar::{Direction, SetId};
use crate::scope::{self, ScopeView};
use crate::session::RadarSession;

/// How long a status message stays before fading out.
const MESSAGE_TTL: Duration = Duration::from_secs(4);

pub async fn run(
    config: Config,
    session: RadarSession,
    ipc_rx: Option<mpsc::Receiver<IpcCommand>>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, session, ipc_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Status line message from the last command.
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
    pub at: Instant,
}

/// What the loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
}

/// The control panel: amount being typed, chosen direction, last result.
#[derive(Debug, Default)]
pub struct ControlPanel {
    pub input: String,
    pub direction: Direction,
    pub message: Option<Message>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &mut RadarSession, now: Instant) -> KeyAction {
        match key {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Esc, ..
            } => return KeyAction::Quit,
            KeyEvent {
                code: KeyCode::Char(ch),
                ..
            } if ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E') => {
                if self.input.len() < 16 {
                    self.input.push(ch);
                }
            }
            KeyEvent {
                code: KeyCode::Char('l'),
                ..
            } => self.direction = Direction::Left,
            KeyEvent {
                code: KeyCode::Char('r'),
                ..
            } => self.direction = Direction::Right,
            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => {
                self.input.pop();
            }
            KeyEvent {
                code: KeyCode::Left,
                ..
            } => self.direction = Direction::Left,
            KeyEvent {
                code: KeyCode::Right,
                ..
            } => self.direction = Direction::Right,
            KeyEvent {
                code: KeyCode::Tab, ..
            } => self.direction = self.direction.toggle(),
            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => self.submit(session, now),
            _ => {}
        }
        KeyAction::None
    }

    /// Send the typed amount. A rejected amount stays in the input box so it
    /// can be corrected.
    fn submit(&mut self, session: &mut RadarSession, now: Instant) {
        match session.rotate(&self.input, self.direction, now) {
            Ok(outcome) => {
                self.message = Some(Message {
                    text: format!(
                        "Rotated {} {}, total {:.2}°",
                        outcome.degrees, outcome.direction, outcome.cumulative_degrees
                    ),
                    is_error: false,
                    at: now,
                });
                self.input.clear();
            }
            Err(e) => {
                info!("Rejected rotate command: {}", e);
                self.message = Some(Message {
                    text: e.to_string(),
                    is_error: true,
                    at: now,
                });
            }
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    mut session: RadarSession,
    mut ipc_rx: Option<mpsc::Receiver<IpcCommand>>,
) -> Result<()> {
    let palette = ScopePalette::from_config(&config.colors);
    let mut markers = MarkerLayer::new();
    let mut panel = ControlPanel::new();
    let frame_interval = config.frame_interval();

    session.paint_initial(&mut markers);

    loop {
        let now = Instant::now();

        // Process IPC commands (non-blocking)
        if let Some(rx) = ipc_rx.as_mut() {
            while let Ok(cmd) = rx.try_recv() {
                crate::ipc::process_ipc_command(cmd, &mut session, now);
            }
        }

        session.frame(now, &mut markers);

        let moving = SetId::ALL.map(|set| session.animator().job(set).is_some());

        terminal.draw(|frame| {
            let area = frame.area();

            let chunks = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(3),
            ])
            .split(area);

            let view = ScopeView {
                display: &config.display,
                palette: &palette,
                markers: &markers,
                moving,
            };
            scope::render(frame, chunks[1], &view);

            render_status(frame, chunks[0], &session, &panel, now);
            render_controls(frame, chunks[2], &panel);
        })?;

        // Handle input
        if event::poll(frame_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && panel.handle_key(key, &mut session, Instant::now()) == KeyAction::Quit
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &RadarSession,
    panel: &ControlPanel,
    now: Instant,
) {
    let status = session.status();
    let mut line = format!(
        " rotation: {:.2}° | blue: {} | red: {} | [q]uit ",
        status.cumulative_degrees,
        status.blue.name(),
        status.red.name(),
    );

    let mut color = (128, 128, 128);
    if let Some(msg) = &panel.message {
        let age = now.saturating_duration_since(msg.at);
        if age < MESSAGE_TTL {
            line.push_str("| ");
            line.push_str(&msg.text);
            let base = if msg.is_error { (255, 80, 80) } else { (120, 220, 120) };
            let fade = age.as_secs_f32() / MESSAGE_TTL.as_secs_f32();
            color = lerp_color(base, (128, 128, 128), fade);
        }
    }

    scope::write_label(frame, area, area.x, area.y, &line, color);
}

fn render_controls(frame: &mut Frame, area: Rect, panel: &ControlPanel) {
    let (left, right) = match panel.direction {
        Direction::Left => ("[left]", " right "),
        Direction::Right => (" left ", "[right]"),
    };
    let text = format!(
        "Rotate {}_ degrees to the {} {}   [Enter] send  [Tab/←/→] direction",
        panel.input, left, right
    );
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Control Panel "),
    );
    frame.render_widget(paragraph, area);
}
