//! Order placement workflow
//!
//! - [`placement::place_order`] - transactional stock decrement + order insert
//! - [`money`] - line validation and totals
//! - [`OrderError`] - workflow errors, converted to `AppError` at the HTTP boundary

pub mod error;
pub mod money;
pub mod placement;

pub use error::OrderError;
pub use placement::{PlaceOrderInput, check_input, parse_items, place_order};
