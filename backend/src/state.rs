use crate::{
    config::Config,
    db::connection::{AdminPool, GuestPool, PoolManager},
};

#[derive(Clone)]
pub struct AppState {
    pub pools: PoolManager,
    pub config: Config,
}

impl AppState {
    pub fn new(pools: PoolManager, config: Config) -> Self {
        Self { pools, config }
    }

    pub fn admin_pool(&self) -> &AdminPool {
        &self.pools.admin
    }

    pub fn guest_pool(&self) -> &GuestPool {
        &self.pools.guest
    }
}
