mod round_generator;

pub use round_generator::{GenerationError, GeneratorConfig, MAX_HEADLINES, MIN_PRICE, RoundGenerator};
