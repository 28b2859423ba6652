use crate::connection::Connection;
use crate::error::Error;

/// A pool that wraps exactly one connection.
#[derive(Debug, Clone)]
pub struct SingleConnPool<C> {
    conn: C,
}

impl<C: Connection> SingleConnPool<C> {
    /// Wrap `conn`. The pool takes over closing it.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Always the wrapped connection.
    pub fn conn(&self) -> C {
        self.conn.clone()
    }

    /// Close the wrapped connection and return its error unchanged.
    pub fn close(self) -> Result<(), Error> {
        self.conn.close().map_err(Error::Close)
    }
}
