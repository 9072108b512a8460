//! Probability distributions.
//!
//! Only the standard normal is needed by the pricers; the heavy lifting
//! (complementary error function) is delegated to `statrs`.

pub mod normal;

pub use normal::{normal_cdf, normal_pdf};
