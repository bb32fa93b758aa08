pub mod auth;
pub mod company;
pub mod order;
pub mod product;
pub mod report;
pub mod supplier;
