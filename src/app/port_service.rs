use crate::domain::model::Port;
use crate::domain::ports::{PortRepository, PortUpserter};
use crate::utils::error::Result;

/// 匯入端與儲存端之間的服務層，不做任何轉換或驗證
pub struct PortService<R: PortRepository> {
    repo: R,
}

impl<R: PortRepository> PortService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R: PortRepository> PortUpserter for PortService<R> {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        self.repo.upsert_port(port)
    }
}
