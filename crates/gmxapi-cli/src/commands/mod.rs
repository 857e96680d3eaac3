pub mod check;
pub mod params;
