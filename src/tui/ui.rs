//! Stateless UI rendering for the agent game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::app::App;
use crate::games::tictactoe::{Cell, GameOutcome, Player, Position};

const CELL_WIDTH: u16 = 12;
const CELL_HEIGHT: u16 = 3;
const BOARD_WIDTH: u16 = CELL_WIDTH * 3 + 2;
const BOARD_HEIGHT: u16 = CELL_HEIGHT * 3 + 2;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = screen_layout(frame.area());

    let title = Paragraph::new("Tic-Tac-Toe vs. Agent")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);

    let status_style = if app.view().error().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let status = Paragraph::new(app.status_line())
        .style(status_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("1-9 / arrows + Enter / click: move   n: new game   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);

    if let Some(outcome) = app.dialog() {
        draw_dialog(frame, outcome);
    }
}

/// Square under a terminal coordinate, given the full frame area.
pub fn cell_at(area: Rect, column: u16, row: u16) -> Option<Position> {
    let board_area = screen_layout(area)[1];
    Position::ALL.into_iter().find(|position| {
        let cell = cell_rect(board_area, *position);
        column >= cell.x && column < cell.right() && row >= cell.y && row < cell.bottom()
    })
}

fn screen_layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

fn cell_rect(area: Rect, position: Position) -> Rect {
    let board = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);
    let x = board.x + position.col() as u16 * (CELL_WIDTH + 1);
    let y = board.y + position.row() as u16 * (CELL_HEIGHT + 1);
    Rect::new(x, y, CELL_WIDTH, CELL_HEIGHT).intersection(area)
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let board = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);
    let separator_style = Style::default().fg(Color::DarkGray);

    for row in 1..3u16 {
        let y = board.y + row * (CELL_HEIGHT + 1) - 1;
        let line = Rect::new(board.x, y, board.width, 1).intersection(area);
        frame.render_widget(
            Paragraph::new("─".repeat(board.width as usize)).style(separator_style),
            line,
        );
    }

    for position in Position::ALL {
        let cell = cell_rect(area, position);
        draw_cell(frame, cell, app, position);
        if position.col() < 2 {
            let sep = Rect::new(cell.right(), cell.y, 1, CELL_HEIGHT).intersection(area);
            frame.render_widget(Paragraph::new("│\n│\n│").style(separator_style), sep);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, position: Position) {
    let view = app.view();
    let cell = view.game_state().map(|state| state.cell(position));

    let (symbol, base_style) = match cell {
        Some(Cell::Mark(Player::X)) => (
            " X ".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Mark(Player::O)) => (
            " O ".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Empty(_)) if view.is_clickable(position) => (
            format!(" {} ", position.number()),
            Style::default().fg(Color::Gray),
        ),
        _ => (
            format!(" {} ", position.number()),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let style = if position == app.cursor() && app.dialog().is_none() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(symbol, style)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_dialog(frame: &mut Frame, outcome: GameOutcome) {
    let area = center_rect(frame.area(), 36, 7);
    let color = match outcome {
        GameOutcome::Win(Player::X) => Color::Green,
        GameOutcome::Win(Player::O) => Color::Red,
        GameOutcome::Draw | GameOutcome::Over => Color::Yellow,
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            outcome.message(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter: new game   Esc: close"),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Game over").borders(Borders::ALL)),
        area,
    );
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_hit_the_right_square() {
        let area = Rect::new(0, 0, 80, 24);
        let center = cell_rect(screen_layout(area)[1], Position::Center);
        assert_eq!(cell_at(area, center.x + 1, center.y + 1), Some(Position::Center));

        let top_left = cell_rect(screen_layout(area)[1], Position::TopLeft);
        assert_eq!(cell_at(area, top_left.x, top_left.y), Some(Position::TopLeft));
        assert_eq!(cell_at(area, 0, 0), None);
    }
}
