//! Domain types: daily closing bars and the descending series built from them.

pub mod bar;
pub mod series;

pub use bar::DayBar;
pub use series::Series;
