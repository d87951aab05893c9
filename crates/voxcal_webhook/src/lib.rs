// --- File: crates/voxcal_webhook/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod booking;
pub mod datetime;
#[cfg(test)]
mod datetime_test;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod normalize;
pub mod routes;
#[cfg(test)]
pub mod test_support;
pub mod tokens;
