use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration handed verbatim to a driver's pool creation.
///
/// Which fields matter is up to the driver: the SQLite driver reads `dbname`
/// and `max_size`, a network driver would also read `host`/`port`/`user`.
/// Anything a driver needs beyond the named fields goes in `options`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub dbname: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Upper bound on concurrently open connections.
    pub max_size: Option<usize>,
    /// Driver-specific options not covered by the named fields.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl PoolConfig {
    #[must_use]
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::new()
    }
}

/// Fluent builder for [`PoolConfig`].
#[derive(Debug, Clone, Default)]
pub struct PoolConfigBuilder {
    cfg: PoolConfig,
}

impl PoolConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: PoolConfig::default(),
        }
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.cfg.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.cfg.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.port = Some(port);
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.cfg.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.cfg.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.cfg.max_size = Some(max_size);
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cfg.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> PoolConfig {
        self.cfg
    }
}
