//! Business logic services

pub mod catalog;
pub mod covers;

use std::sync::Arc;

use crate::{config::CoversConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository and the Open Library cover client
    pub fn new(repository: Repository, covers_config: CoversConfig) -> AppResult<Self> {
        let covers = covers::CoverService::new(covers_config)?;
        Ok(Self::with_covers(repository, Arc::new(covers)))
    }

    /// Create all services with a custom cover lookup
    pub fn with_covers(repository: Repository, covers: Arc<dyn covers::CoverLookup>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), covers),
            repository,
        }
    }
}
