// src/models.rs

pub mod auth;
pub mod company;
pub mod order;
pub mod pagination;
pub mod product;
pub mod report;
pub mod supplier;
