pub mod configure;
pub mod dispatch;
pub mod export;
pub mod files;
pub mod project;
pub mod schema;
pub mod search;
pub mod session;
pub mod settings;
pub mod shared;
