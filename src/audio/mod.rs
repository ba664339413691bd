pub mod capture;
pub mod monitor;
pub mod playback;
pub mod segment;
