pub mod board;
pub mod catalog;
pub mod game;
pub mod generator;
pub mod rules;

#[cfg(test)]
mod turn_test;
