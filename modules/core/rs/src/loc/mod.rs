pub use interval::Interval;
pub use location::Location;
pub use strand::Strand;

mod interval;
mod location;
mod strand;
