//! Special functions used by the quadrature rules.

pub mod legendre;

pub use legendre::{legendre, legendre_with_diff, LegendreRoots};
