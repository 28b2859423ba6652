//! Connection pools.
//!
//! A [`ConnPool`] is created once per logical client and shared read-mostly
//! between callers. It owns its connections until [`ConnPool::close`] is
//! called; dropping a pool never calls [`Connection::close`].
//!
//! Closing consumes the pool. Connections previously returned by
//! [`ConnPool::conn`], and clones of the pool held elsewhere, are separate
//! handles: for tonic channels they keep the HTTP/2 connection open until
//! they are dropped as well.

mod round_robin;
mod service;
mod single;

pub use round_robin::RoundRobinConnPool;
pub use single::SingleConnPool;

use crate::connection::Connection;
use crate::error::Error;

/// A fixed set of connections plus a selection strategy.
#[derive(Debug, Clone)]
pub enum ConnPool<C> {
    /// Exactly one connection, returned on every call.
    Single(SingleConnPool<C>),
    /// Two or more connections, selected round robin.
    RoundRobin(RoundRobinConnPool<C>),
}

impl<C: Connection> ConnPool<C> {
    /// Wrap caller-built connections in the matching pool variant.
    ///
    /// Returns `None` for an empty set. A single connection always degrades to
    /// [`ConnPool::Single`].
    pub fn from_conns(mut conns: Vec<C>) -> Option<Self> {
        match conns.len() {
            0 => None,
            1 => conns.pop().map(|conn| ConnPool::Single(SingleConnPool::new(conn))),
            _ => Some(ConnPool::RoundRobin(RoundRobinConnPool::new(conns))),
        }
    }

    /// Select a connection for the next call.
    pub fn conn(&self) -> C {
        match self {
            ConnPool::Single(pool) => pool.conn(),
            ConnPool::RoundRobin(pool) => pool.conn(),
        }
    }

    /// Number of connections owned by the pool.
    pub fn num(&self) -> usize {
        match self {
            ConnPool::Single(_) => 1,
            ConnPool::RoundRobin(pool) => pool.len(),
        }
    }

    /// Close every owned connection.
    ///
    /// Call it once, after all users of the pool are done.
    pub fn close(self) -> Result<(), Error> {
        match self {
            ConnPool::Single(pool) => pool.close(),
            ConnPool::RoundRobin(pool) => pool.close(),
        }
    }
}

impl<C: Connection> From<C> for ConnPool<C> {
    fn from(conn: C) -> Self {
        ConnPool::Single(SingleConnPool::new(conn))
    }
}
