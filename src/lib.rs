//! Headless admin console for site notifications and the shop/user
//! introduction texts.

pub mod api;
pub mod config;
pub mod config_modal;
pub mod model;
pub mod notice;
pub mod notification_modal;
pub mod page;
pub mod render;
pub mod table;
