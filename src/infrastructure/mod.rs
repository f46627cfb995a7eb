// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_source;
pub mod html_surface;
pub mod http_response;
pub mod plotly_mapper;
