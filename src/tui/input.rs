//! Cursor movement for keyboard navigation.

use crate::games::tictactoe::Position;
use crossterm::event::KeyCode;

/// Moves cursor based on arrow keys (or vi keys). Stops at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());

    let target = match key {
        KeyCode::Right | KeyCode::Char('l') => Position::from_row_col(row, col + 1),
        KeyCode::Left | KeyCode::Char('h') => col
            .checked_sub(1)
            .and_then(|col| Position::from_row_col(row, col)),
        KeyCode::Down | KeyCode::Char('j') => Position::from_row_col(row + 1, col),
        KeyCode::Up | KeyCode::Char('k') => row
            .checked_sub(1)
            .and_then(|row| Position::from_row_col(row, col)),
        _ => None,
    };

    target.unwrap_or(cursor)
}

/// Maps a digit key to the square with that number.
pub fn digit_position(key: KeyCode) -> Option<Position> {
    match key {
        KeyCode::Char(c) => c
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(Position::new),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_move_within_board() {
        assert_eq!(move_cursor(Position::Center, KeyCode::Up), Position::TopCenter);
        assert_eq!(move_cursor(Position::Center, KeyCode::Char('l')), Position::MiddleRight);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Left), Position::TopLeft);
        assert_eq!(move_cursor(Position::BottomRight, KeyCode::Down), Position::BottomRight);
    }

    #[test]
    fn digits_map_to_squares() {
        assert_eq!(digit_position(KeyCode::Char('1')), Some(Position::TopLeft));
        assert_eq!(digit_position(KeyCode::Char('0')), None);
        assert_eq!(digit_position(KeyCode::Enter), None);
    }
}
