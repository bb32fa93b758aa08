// src/common.rs

pub mod dates;
pub mod error;
pub mod money;
pub mod response;
