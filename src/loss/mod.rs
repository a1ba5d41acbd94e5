pub mod functions;

pub use functions::{Loss, Mse};
