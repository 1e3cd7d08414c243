pub mod importer;
pub mod shutdown;

pub use crate::domain::model::{Coordinates, Port};
pub use crate::domain::ports::{ConfigProvider, PortRepository, PortUpserter};
pub use crate::utils::error::Result;
pub use importer::{FileImporter, ImportSummary};
pub use shutdown::ShutdownSignal;
