//! A connection pool wrapper that can serialize writers.

use std::sync::{Arc, RwLock};

use diesel::r2d2::{ConnectionManager, Pool, PoolError, R2D2Connection};

use crate::modules::error::InternalError;

/// Either a plain pool, or a pool behind a lock that admits one writer at a time.
pub enum ConnectionPool<C: R2D2Connection + 'static> {
    Normal(Pool<ConnectionManager<C>>),
    WriteExclusive(Arc<RwLock<Pool<ConnectionManager<C>>>>),
}

impl<C: R2D2Connection> ConnectionPool<C> {
    /// Runs `f` with a pooled connection, holding the write lock if there is one.
    pub fn execute_write<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut C) -> Result<T, E>,
        E: From<PoolError> + From<InternalError>,
    {
        match self {
            Self::Normal(pool) => f(&mut *pool.get()?),
            Self::WriteExclusive(locked_pool) => {
                let pool = locked_pool.write().map_err(|_| {
                    InternalError::with_message("Connection pool rwlock is poisoned".into())
                })?;
                let mut conn = pool.get()?;
                f(&mut *conn)
            }
        }
    }

    /// Runs `f` with a pooled connection, sharing the lock with other readers.
    pub fn execute_read<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut C) -> Result<T, E>,
        E: From<PoolError> + From<InternalError>,
    {
        match self {
            Self::Normal(pool) => f(&mut *pool.get()?),
            Self::WriteExclusive(locked_pool) => {
                let pool = locked_pool.read().map_err(|_| {
                    InternalError::with_message("Connection pool rwlock is poisoned".into())
                })?;
                let mut conn = pool.get()?;
                f(&mut *conn)
            }
        }
    }
}

impl<C: R2D2Connection> Clone for ConnectionPool<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Normal(pool) => Self::Normal(pool.clone()),
            Self::WriteExclusive(locked_pool) => Self::WriteExclusive(Arc::clone(locked_pool)),
        }
    }
}

impl<C: R2D2Connection> From<Pool<ConnectionManager<C>>> for ConnectionPool<C> {
    fn from(pool: Pool<ConnectionManager<C>>) -> Self {
        Self::Normal(pool)
    }
}

impl<C: R2D2Connection> From<Arc<RwLock<Pool<ConnectionManager<C>>>>> for ConnectionPool<C> {
    fn from(locked_pool: Arc<RwLock<Pool<ConnectionManager<C>>>>) -> Self {
        Self::WriteExclusive(locked_pool)
    }
}
