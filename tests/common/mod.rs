#[cfg(test)]
#[allow(dead_code)]
pub mod recording_engine;
pub use recording_engine::*;

#[cfg(test)]
#[allow(dead_code)]
pub mod test_data;
pub use test_data::*;
