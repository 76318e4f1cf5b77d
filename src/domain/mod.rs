pub mod error;
pub mod game;
pub mod peg;
pub mod rules;
pub mod solver;
