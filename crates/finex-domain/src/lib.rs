//! finex-domain
//!
//! Pure domain models (income and expense records, derived report views).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod expense;
pub mod export;
pub mod income;
pub mod ratios;
pub mod views;

pub use common::*;
pub use expense::*;
pub use export::*;
pub use income::*;
pub use ratios::*;
pub use views::*;
