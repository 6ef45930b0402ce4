pub mod artifact;
pub mod dispatch;
pub mod import;
pub mod schema;
pub mod stage;
