pub mod config;
pub mod dispatch;
pub mod help;
pub mod pr;
pub mod registry;
