//! Command handlers

pub mod add;
pub mod serve;
