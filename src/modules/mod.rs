pub mod catalog;
pub mod enrollment;
pub mod families;
pub mod import;
pub mod users;
