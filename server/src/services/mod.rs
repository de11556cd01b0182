//! Business logic services for tripnote

mod review;

pub use review::ReviewService;
