// Domain layer: the port record and the capabilities the importer and store are wired through.

pub mod model;
pub mod ports;
