//! # Graph Model
//!
//! Plain data shared by the engine and the region layer: ids, the datum and
//! weight contracts, matrices and region statistics.
//!
//! Design rule: no graph state lives here. Everything in this module is
//! value types and pure functions.

pub mod node;
pub mod datum;
pub mod weight;
pub mod matrix;
pub mod means;

pub use node::{NodeId, NodePair, NodeHandle};
pub use datum::{Accumulate, Datum, Weight};
pub use weight::{WeightFn, VoidWeight, EdgeSymmetry, Symmetric, Asymmetric};
pub use matrix::{Matrix, Pixel};
pub use means::{
    MeansNode, MeanValue, Rgb,
    ScalarMeanDistance, ScalarHarisDistance, ColorMeanDistance, ColorHarisDistance,
};
