pub mod port_service;

pub use port_service::PortService;
