pub mod auth;
pub mod mail;
pub mod order_service;
pub mod pdf;
pub mod product_service;
pub mod report_service;
pub mod supplier_service;

#[cfg(test)]
pub mod testing;
