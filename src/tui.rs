//! TUI (Terminal User Interface) module for LeWord
//!
//! Shows the board while the agent plays, using Ratatui.
//!
//! # State Machine
//! - `Playing` while turns are reported, with a short pause after each turn
//! - `GameOver` once the summary arrives; any key closes the screen
//! - ESC or `q` during play asks the game loop to stop

use crate::board::{BoardImage, TileColor};
use crate::cli::outcome_line;
use crate::game_state::{GameInterface, GameIntro, GameSummary, TurnReport};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const TURN_PAUSE_MS: u64 = 700;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    Playing,
    GameOver,
}

fn tile_colors(color: TileColor) -> (Color, Color) {
    let [r, g, b] = color.rgb();
    let fg = match color {
        TileColor::Green => Color::White,
        TileColor::Orange | TileColor::Gray | TileColor::White => Color::Black,
    };
    (Color::Rgb(r, g, b), fg)
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
}

/// Groups what a frame needs so rendering stays a pure function of state.
struct RenderContext<'a> {
    board: Option<&'a BoardImage>,
    intro: Option<&'a GameIntro>,
    last_turn: Option<&'a TurnReport>,
    message: &'a str,
    state: TuiState,
}

pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    intro: Option<GameIntro>,
    board: Option<BoardImage>,
    last_turn: Option<TurnReport>,
    message: String,
    state: TuiState,
    quit: bool,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            intro: None,
            board: None,
            last_turn: None,
            message: String::new(),
            state: TuiState::Playing,
            quit: false,
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            board: self.board.as_ref(),
            intro: self.intro.as_ref(),
            last_turn: self.last_turn.as_ref(),
            message: &self.message,
            state: self.state,
        };
        self.terminal.draw(|f| render(f, &ctx))?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Waits up to `timeout` for a quit key.
    fn poll_quit(&mut self, timeout: Duration) {
        match event::poll(timeout) {
            Ok(true) => {
                if let Ok(Event::Key(key)) = event::read()
                    && is_quit_key(&key)
                {
                    info_log!("poll_quit() - quit requested");
                    self.quit = true;
                }
            }
            Ok(false) => {}
            Err(e) => {
                debug_log!("poll_quit() - event poll failed: {}", e);
                self.quit = true;
            }
        }
    }

    fn wait_for_key(&mut self) {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return,
                Ok(_) => {}
                Err(e) => {
                    debug_log!("wait_for_key() - event read failed: {}", e);
                    return;
                }
            }
        }
    }
}

fn render(f: &mut Frame, ctx: &RenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(6),    // Board
            Constraint::Length(8), // Info panel
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_board(f, chunks[1], ctx.board);
    render_info(f, chunks[2], ctx);
    render_instructions(f, chunks[3], ctx.state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("LEWORD")
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn board_lines(board: &BoardImage) -> Vec<Line<'static>> {
    board
        .rows
        .iter()
        .map(|row| {
            let mut spans = vec![Span::raw("  ")];
            for tile in row {
                let (bg, fg) = tile_colors(tile.color);
                spans.push(Span::styled(
                    format!(" {} ", tile.letter),
                    Style::default().fg(fg).bg(bg),
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_board(f: &mut Frame, area: Rect, board: Option<&BoardImage>) {
    let block = Block::default().title("Board").borders(Borders::ALL);
    let inner_height = usize::from(block.inner(area).height);
    let mut lines = board.map(board_lines).unwrap_or_default();
    // Keep the most recent rows visible
    if lines.len() > inner_height {
        lines.drain(..lines.len() - inner_height);
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let mut lines = Vec::new();

    if let Some(intro) = ctx.intro {
        lines.push(Line::from(vec![Span::styled(
            format!("Hint: {}", intro.hint),
            HEADER_STYLE,
        )]));
        lines.push(Line::from(format!(
            "{} letters, {} attempts",
            intro.word_length, intro.max_attempts
        )));
    }

    if let Some(turn) = ctx.last_turn {
        let style = if turn.attempt.is_valid() {
            INFO_STYLE
        } else {
            ERROR_STYLE
        };
        lines.push(Line::from(vec![Span::styled(
            format!(
                "Turn {}: {} -> {} (score {})",
                turn.turn,
                turn.attempt.guess(),
                turn.attempt.feedback(),
                turn.attempt.score()
            ),
            style,
        )]));
        lines.push(Line::from(format!("{} attempts left", turn.attempts_left)));
    }

    if !ctx.message.is_empty() {
        lines.push(Line::from(vec![Span::styled(ctx.message, SUCCESS_STYLE)]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Information").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::Playing => "Agent is playing | ESC/Q: Stop",
        TuiState::GameOver => "Press any key to exit",
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

impl GameInterface for TuiInterface {
    fn display_intro(&mut self, intro: &GameIntro) {
        self.intro = Some(intro.clone());
        self.draw_or_log();
    }

    fn display_turn(&mut self, turn: &TurnReport) {
        debug_log!("TuiInterface::display_turn() - turn {}", turn.turn);
        self.board = Some(turn.board.clone());
        self.last_turn = Some(turn.clone());
        self.draw_or_log();
        self.poll_quit(Duration::from_millis(TURN_PAUSE_MS));
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.state = TuiState::GameOver;
        self.message = outcome_line(summary);
        self.draw_or_log();
        self.wait_for_key();
    }

    fn should_stop(&mut self) -> bool {
        self.quit
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardRenderer, TileRenderer};
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_tile_colors_follow_board_palette() {
        let (bg, fg) = tile_colors(TileColor::Green);
        assert_eq!(bg, Color::Rgb(0, 128, 0));
        assert_eq!(fg, Color::White);
        assert_eq!(tile_colors(TileColor::Gray).1, Color::Black);
    }

    #[test]
    fn test_board_lines_one_per_row() {
        let board = TileRenderer.render(&["ap??E", "H???o"], 5);
        let lines = board_lines(&board);
        assert_eq!(lines.len(), 2);
        // Leading pad plus a tile and a gap per letter
        assert_eq!(lines[0].spans.len(), 1 + 2 * 5);
        assert_eq!(lines[1].spans[1].content, " H ");
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
