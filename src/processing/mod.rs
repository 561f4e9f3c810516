pub mod classification;
pub mod grain_size;
pub mod interpolation;
pub mod statistics;
