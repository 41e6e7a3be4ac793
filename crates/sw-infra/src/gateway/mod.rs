mod dto;
mod http;

pub use http::HttpRegistrationGateway;
