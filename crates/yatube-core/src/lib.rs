//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! This crate contains the content, permission and pagination rules with zero
//! infrastructure dependencies; storage and authentication are reached
//! through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::{Accounts, Actor, Blog, Page};
