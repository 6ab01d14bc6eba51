use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions},
    pool::PoolConnection,
    MySql,
};
use std::fmt;

use crate::config::{Config, PoolConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbRole {
    Admin,
    Guest,
}

impl DbRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DbRole::Admin => "admin",
            DbRole::Guest => "guest",
        }
    }
}

impl fmt::Display for DbRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pool bound to one database role.
///
/// Checked-out connections go back to the pool when the returned
/// [`PoolConnection`] is dropped, so every exit path releases exactly once.
#[async_trait]
pub trait RolePool: Send + Sync {
    fn role(&self) -> DbRole;

    fn pool(&self) -> &MySqlPool;

    async fn acquire(&self) -> Result<PoolConnection<MySql>, sqlx::Error> {
        let conn = self.pool().acquire().await;
        if let Err(err) = &conn {
            tracing::warn!(role = %self.role(), error = %err, "Connection checkout failed");
        }
        conn
    }
}

/// Schema and write access. The only role allowed to create tables or insert.
#[derive(Clone, Debug)]
pub struct AdminPool(MySqlPool);

/// Restricted role used for caller-supplied queries.
#[derive(Clone, Debug)]
pub struct GuestPool(MySqlPool);

impl RolePool for AdminPool {
    fn role(&self) -> DbRole {
        DbRole::Admin
    }

    fn pool(&self) -> &MySqlPool {
        &self.0
    }
}

impl RolePool for GuestPool {
    fn role(&self) -> DbRole {
        DbRole::Guest
    }

    fn pool(&self) -> &MySqlPool {
        &self.0
    }
}

#[derive(Clone, Debug)]
pub struct PoolManager {
    pub admin: AdminPool,
    pub guest: GuestPool,
}

impl PoolManager {
    /// Opens both pools eagerly; a bad credential or unreachable host fails here.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let admin = pool_options(&config.pool)
            .connect_with(connect_options(config, DbRole::Admin))
            .await?;
        let guest = pool_options(&config.pool)
            .connect_with(connect_options(config, DbRole::Guest))
            .await?;

        Ok(Self {
            admin: AdminPool(admin),
            guest: GuestPool(guest),
        })
    }

    /// Builds both pools without connecting; connections open on first checkout.
    pub fn connect_lazy(config: &Config) -> Self {
        Self {
            admin: AdminPool(
                pool_options(&config.pool).connect_lazy_with(connect_options(config, DbRole::Admin)),
            ),
            guest: GuestPool(
                pool_options(&config.pool).connect_lazy_with(connect_options(config, DbRole::Guest)),
            ),
        }
    }
}

fn pool_options(pool: &PoolConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(pool.max_connections)
        .acquire_timeout(pool.acquire_timeout)
}

fn connect_options(config: &Config, role: DbRole) -> MySqlConnectOptions {
    let (user, password) = match role {
        DbRole::Admin => (&config.admin_user, &config.admin_password),
        DbRole::Guest => (&config.guest_user, &config.guest_password),
    };

    MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .database(&config.db_name)
        .username(user)
        .password(password)
}
