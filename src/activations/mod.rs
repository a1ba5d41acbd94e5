//! # Activation Functions Module
//!
//! Element-wise non-linearities used by the dense layers of a Q-network.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used for the Q-value output layer
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//!
//! ```rust
//! use deepq::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5], [0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0], [0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
