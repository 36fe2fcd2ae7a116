#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod error;
pub mod evaluator;
pub mod resolver;
pub mod validate;
pub mod variants;

pub use error::{Error, Result};
