pub mod assistant_controller;
pub mod route_controller;
