//! Business logic services

pub mod auth;
pub mod catalog;
pub mod exchange;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub exchange: exchange::ExchangeService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            exchange: exchange::ExchangeService::new(repository, config.import.atomic),
        }
    }
}
