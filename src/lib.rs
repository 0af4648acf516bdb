#![forbid(unsafe_code)]

pub mod app;
pub mod availability;
pub mod cart;
pub mod catalog;
pub mod category;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod drive_image;
pub mod formats;
pub mod hierarchy;
pub mod layout;
pub mod logging;
pub mod order;
pub mod overrides;
pub mod records;
pub mod sheet;
pub mod store;
pub mod storefront;
pub mod tokenizer;
pub mod upload;
