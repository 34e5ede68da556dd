//! Executable model of the generated offline worker.
//!
//! The worker script in `static/service-worker.js` runs inside a browser,
//! where it is hard to test. [`OfflineCacheRuntime`] implements the same
//! lifecycle and serve strategies over the [`CacheStorage`] and [`Network`]
//! traits, so every transition and fallback can be exercised in plain unit
//! tests. Both share the constants in [`strategy`].
//!
//! ## Lifecycle
//!
//! ```text
//! Installing ──install ok──▶ Waiting ──activate──▶ Activating ──▶ Active
//!     │
//!     └──install failed──▶ Redundant
//! ```
//!
//! Each transition happens once per deployed version. Calling a transition
//! from the wrong state is an [`RuntimeError::InvalidTransition`], as is
//! fetching through a worker that is not `Active`.
//!
//! ## Serving
//!
//! | Request | Strategy | Network failure falls back to |
//! |---|---|---|
//! | `GET` static asset or `/icons/…` | cache-first, store 2xx | cached icon (icons) or shell page |
//! | anything else | network-first, never stored | matching entry (`GET` only), then shell page |
//!
//! When the fallback entry itself is missing the fetch is
//! [`RuntimeError::Unavailable`].

pub mod http;
pub mod storage;
pub mod strategy;

pub use http::{Network, NetworkError, Request, Response};
pub use storage::{CacheStorage, MemoryCacheStorage};

use strategy::{STATIC_ASSETS, Strategy, cache_name, classify, offline_fallback};
use thiserror::Error;

/// Worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Installing,
    Waiting,
    Activating,
    Active,
    /// Install failed; the worker never controls a client.
    Redundant,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: Lifecycle,
        action: &'static str,
    },
    #[error("install failed on {path}: {reason}")]
    InstallFailed { path: &'static str, reason: String },
    #[error("{path} unavailable: network failed and no cached fallback")]
    Unavailable { path: String },
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache_name: String,
    pub precached: usize,
}

/// Outcome of activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Caches removed because their name was not the current one.
    pub deleted: Vec<String>,
    pub clients_claimed: bool,
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
    /// An offline substitute (shell page or fallback icon).
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub from: ServedFrom,
}

/// One deployed worker version.
pub struct OfflineCacheRuntime<S: CacheStorage, N: Network> {
    state: Lifecycle,
    cache_name: String,
    skip_waiting: bool,
    storage: S,
    network: N,
}

impl<S: CacheStorage, N: Network> OfflineCacheRuntime<S, N> {
    pub fn new(version: &str, storage: S, network: N) -> Self {
        Self {
            state: Lifecycle::Installing,
            cache_name: cache_name(version),
            skip_waiting: false,
            storage,
            network,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Whether the worker has asked to replace a waiting predecessor.
    /// Set when install starts, before any asset is fetched.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    fn require(&self, expected: Lifecycle, action: &'static str) -> Result<(), RuntimeError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RuntimeError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    /// Open the versioned cache and precache every static asset.
    ///
    /// All-or-nothing: the first failed or non-2xx asset aborts the install,
    /// nothing is stored, and the worker becomes [`Lifecycle::Redundant`].
    pub fn install(&mut self) -> Result<InstallReport, RuntimeError> {
        self.require(Lifecycle::Installing, "install")?;
        self.skip_waiting = true;
        self.storage.open(&self.cache_name);

        let mut entries = Vec::with_capacity(STATIC_ASSETS.len());
        for path in STATIC_ASSETS {
            let request = Request::get(path);
            let failure = match self.network.fetch(&request) {
                Ok(response) if response.is_success() => {
                    entries.push((request, response));
                    continue;
                }
                Ok(response) => format!("status {}", response.status),
                Err(e) => e.to_string(),
            };
            log::warn!("Install of {} failed on {path}: {failure}", self.cache_name);
            self.state = Lifecycle::Redundant;
            return Err(RuntimeError::InstallFailed {
                path,
                reason: failure,
            });
        }

        let precached = entries.len();
        self.storage.put_all(&self.cache_name, entries);
        self.state = Lifecycle::Waiting;
        log::debug!("Installed {} with {precached} assets", self.cache_name);
        Ok(InstallReport {
            cache_name: self.cache_name.clone(),
            precached,
        })
    }

    /// Delete every cache but the current one, then claim clients.
    pub fn activate(&mut self) -> Result<ActivationReport, RuntimeError> {
        self.require(Lifecycle::Waiting, "activate")?;
        self.state = Lifecycle::Activating;

        let mut deleted = Vec::new();
        for name in self.storage.keys() {
            if name != self.cache_name && self.storage.delete(&name) {
                log::debug!("Deleted stale cache {name}");
                deleted.push(name);
            }
        }

        self.state = Lifecycle::Active;
        Ok(ActivationReport {
            deleted,
            clients_claimed: true,
        })
    }

    /// Serve one request. Safe to call from several threads at once.
    pub fn fetch(&self, request: &Request) -> Result<Served, RuntimeError> {
        self.require(Lifecycle::Active, "fetch")?;
        match classify(&request.method, &request.path) {
            Strategy::CacheFirst => self.cache_first(request),
            Strategy::NetworkFirst => self.network_first(request),
        }
    }

    fn cache_first(&self, request: &Request) -> Result<Served, RuntimeError> {
        if let Some(response) = self.storage.lookup(&self.cache_name, request) {
            return Ok(Served {
                response,
                from: ServedFrom::Cache,
            });
        }
        match self.network.fetch(request) {
            Ok(response) => {
                if response.is_success() {
                    self.storage
                        .put(&self.cache_name, request, response.clone());
                }
                Ok(Served {
                    response,
                    from: ServedFrom::Network,
                })
            }
            Err(e) => {
                log::debug!("{} offline: {e}", request.path);
                self.fallback(&request.path, offline_fallback(&request.path))
            }
        }
    }

    fn network_first(&self, request: &Request) -> Result<Served, RuntimeError> {
        match self.network.fetch(request) {
            Ok(response) => Ok(Served {
                response,
                from: ServedFrom::Network,
            }),
            Err(e) => {
                log::debug!("{} {} offline: {e}", request.method, request.path);
                if request.is_get() {
                    if let Some(response) = self.storage.lookup(&self.cache_name, request) {
                        return Ok(Served {
                            response,
                            from: ServedFrom::Cache,
                        });
                    }
                }
                self.fallback(&request.path, strategy::SHELL_PAGE)
            }
        }
    }

    fn fallback(&self, requested: &str, target: &str) -> Result<Served, RuntimeError> {
        self.storage
            .lookup(&self.cache_name, &Request::get(target))
            .map(|response| Served {
                response,
                from: ServedFrom::Fallback,
            })
            .ok_or_else(|| RuntimeError::Unavailable {
                path: requested.to_string(),
            })
    }
}
