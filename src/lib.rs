//! Two casual flag games: a matching-pairs memory board and a timed
//! flag-to-country quiz. The controllers under `pairs` and `quiz` are pure
//! state machines on a virtual clock; `games` drives them from a terminal.

pub mod error;
pub mod games;
pub mod logging;
pub mod pairs;
pub mod quiz;
pub mod records;
pub mod schedule;
pub mod shuffle;
pub mod terminal;
