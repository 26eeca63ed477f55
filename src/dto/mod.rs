pub mod assistant_dto;
pub mod route_dto;
