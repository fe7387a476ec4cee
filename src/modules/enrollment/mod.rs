pub mod controller;
pub mod model;
pub mod number;
pub mod router;
pub mod service;
