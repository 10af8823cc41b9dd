pub mod extent;
pub mod station;

pub use extent::BoundingExtent;
pub use station::StationRecord;
