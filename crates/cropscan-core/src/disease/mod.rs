pub mod model;

pub use model::{Disease, UpdateSolutionRequest};
