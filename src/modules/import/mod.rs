pub mod controller;
pub mod model;
pub mod normalizer;
pub mod service;
pub mod template;
