pub mod config;
pub mod connect;
pub mod count;
pub mod encode;
pub mod post;
