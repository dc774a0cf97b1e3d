//! # Base types for chessmove
//!
//! This is an auxiliary crate for `chessmove`, which contains the plain value types: squares,
//! pieces, castling rights and square sets. It knows nothing about the rules of chess.
//!
//! Normally you don't want to use this crate directly. Use `chessmove` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
