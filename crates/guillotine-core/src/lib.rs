// Scoring engine for guillotine league standings, season recaps, and manager careers.
//
// Everything in this crate is pure and synchronous: callers fetch season data
// and hand it in, the engine hands back colors, ranks, and summary numbers.

pub mod color;
pub mod model;
pub mod profile;
pub mod recap;
pub mod season;
pub mod standings;
pub mod stats;
