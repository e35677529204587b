//! Result persistence and charts, run after a successful simulation.

pub mod csv;
pub mod plot;

pub use self::csv::write_results;
pub use self::plot::render_all;
