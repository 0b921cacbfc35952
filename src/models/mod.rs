//! Domain models and API payloads

pub mod borrowing;
pub mod category;
pub mod item;
pub mod notification;
pub mod purchase;
pub mod user;
