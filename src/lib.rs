//! Core library for the registrar-tools command line application.
//!
//! The library reconciles scraped enrollment, user-profile, and grant data
//! into per-program registration workbooks. The modules are structured to
//! keep responsibilities narrow and composable: workbook access lives in
//! [`store`], the raw table loaders in [`input`], identity resolution in
//! [`resolve`], destination routing in [`route`] and [`registry`], the
//! non-destructive row merge in [`upsert`], audit persistence in [`audit`],
//! and the per-run orchestration in [`distribute`].

pub mod audit;
pub mod distribute;
pub mod error;
pub mod input;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod route;
pub mod store;
pub mod upsert;

pub use error::{DistributeError, Result};
