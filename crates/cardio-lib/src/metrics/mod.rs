pub mod hrv;
pub mod intervals;
