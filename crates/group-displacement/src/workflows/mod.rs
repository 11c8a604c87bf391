pub mod displacement;
pub mod import;
