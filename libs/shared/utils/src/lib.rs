pub mod random;
pub mod test_utils;

pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
