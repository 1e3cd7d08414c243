use crate::domain::model::Port;
use crate::utils::error::Result;
use std::sync::Arc;

/// Storage capability: insert-or-replace a port keyed by its unloc.
pub trait PortRepository: Send + Sync {
    fn upsert_port(&self, port: &Port) -> Result<()>;
}

/// What the importer needs from the application layer.
pub trait PortUpserter: Send + Sync {
    fn upsert_port(&self, port: &Port) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_file(&self) -> &str;
    fn database_path(&self) -> &str;
    fn monitoring_enabled(&self) -> bool;
    fn json_logs(&self) -> bool;
}

impl<R: PortRepository + ?Sized> PortRepository for &R {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        (**self).upsert_port(port)
    }
}

impl<R: PortRepository + ?Sized> PortRepository for Arc<R> {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        (**self).upsert_port(port)
    }
}

impl<S: PortUpserter + ?Sized> PortUpserter for &S {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        (**self).upsert_port(port)
    }
}

impl<S: PortUpserter + ?Sized> PortUpserter for Arc<S> {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        (**self).upsert_port(port)
    }
}
