use std::fs::File;
use std::io::{self, stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use blockfall::input::{frames_for_millis, is_quit_key, CommandLatch, KeySampler};
use blockfall::{Cell, Game, GameConfig, PieceKind, Snapshot, BOARD_HEIGHT, BOARD_WIDTH};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser)]
#[command(name = "blockfall", about = "Falling-block puzzle for the terminal")]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seconds between automatic descents
    #[arg(long)]
    fall_interval: Option<f32>,
    /// Seed for the piece randomizer
    #[arg(long)]
    seed: Option<u64>,
    /// Target frames per second
    #[arg(long)]
    frame_rate: Option<u32>,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Milliseconds a key stays held without a repeat, on terminals that do
    /// not report key releases
    #[arg(long)]
    release_grace_ms: Option<u32>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        config.apply_env()?;

        if let Some(fall_interval) = self.fall_interval {
            config.fall_interval = fall_interval;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        if let Some(release_grace_ms) = self.release_grace_ms {
            config.release_grace_ms = release_grace_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

const DEFAULT_LOG_FILTER: &str = "warn";

// The terminal is taken over by the UI, so no logger is installed without a
// log file. RUST_LOG only applies to the file.
fn build_logger(config: &GameConfig) -> anyhow::Result<Option<env_logger::Builder>> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    );
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    Ok(Some(builder))
}

fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    if let Some(mut builder) = build_logger(config)? {
        builder.init();
    }
    Ok(())
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

fn piece_color(kind: PieceKind) -> Color {
    let (r, g, b) = kind.color().to_rgb8();
    Color::Rgb(r, g, b)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.size();
    render_game(frame, snapshot, area);
    if snapshot.game_over {
        render_game_over(frame, area);
    }
}

fn render_game(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let grid_display_width = (BOARD_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = BOARD_HEIGHT as u16 + 2;
    let preview_width = 12;
    let total_width = grid_display_width + preview_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
    ])
    .split(game_row);

    render_grid(frame, snapshot, horizontal[0]);
    render_preview(frame, snapshot.next, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↓/S: Drop | ↑/W: Rotate | Space: Hard drop | R: Reset | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .visual_grid()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::raw(EMPTY_CHAR),
                    Cell::Filled(kind) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(piece_color(*kind)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, next: PieceKind, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (cells, width, height) = next.preview_cells();
    let style = Style::default().fg(piece_color(next));

    let mut lines: Vec<Line> = vec![Line::from("")];
    for y in 0..height as i16 {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for x in 0..width as i16 {
            if cells.contains(&(x, y)) {
                spans.push(Span::styled(BLOCK_CHAR, style));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_game_over(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to restart",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 9, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &mut Game,
    frame_rate: u32,
    mut sampler: KeySampler,
) -> io::Result<()> {
    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(frame_rate));
    let mut latch = CommandLatch::new();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &game.snapshot()))?;

        // Collect input until the frame is due
        let deadline = last_frame + frame_duration;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release && is_quit_key(&key) {
                    return Ok(());
                }
                sampler.handle_key(&key);
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let commands = latch.sample(&sampler.end_frame());
        game.update(dt, &commands);

        for event in game.take_events() {
            log::debug!("{event:?}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(&config)?;
    log::info!("starting with {config:?}");

    let mut game = Game::new(&config);

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    let reports_release = supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let sampler = if reports_release {
        KeySampler::with_release_events()
    } else {
        let grace = frames_for_millis(config.release_grace_ms, config.frame_rate);
        log::info!("no key release events, holding keys for {grace} frames");
        KeySampler::with_release_grace(grace)
    };
    let result = run(&mut terminal, &mut game, config.frame_rate, sampler);

    // Restore terminal
    if reports_release {
        stdout().execute(PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.context("terminal loop failed")
}
