//! Game types.

pub mod tictactoe;
