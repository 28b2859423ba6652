use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::connection::Connection;
use crate::error::Error;

/// A fixed set of connections handed out in cyclic order.
///
/// The connection set never changes after construction; only the cursor
/// moves. Clones share both, so selection stays fair across every holder of
/// the pool.
#[derive(Debug, Clone)]
pub struct RoundRobinConnPool<C> {
    conns: Arc<Vec<C>>,
    cursor: Arc<AtomicUsize>,
}

impl<C: Connection> RoundRobinConnPool<C> {
    /// Build a pool over `conns`, which must hold at least two connections.
    pub(crate) fn new(conns: Vec<C>) -> Self {
        debug_assert!(conns.len() >= 2, "round robin pool needs two or more connections");
        Self {
            conns: Arc::new(conns),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pick the next connection.
    ///
    /// The cursor is incremented before indexing, so the first call returns the
    /// connection at index `1 % len`, not index 0.
    pub fn conn(&self) -> C {
        let cursor = self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.conns[cursor % self.conns.len()].clone()
    }

    /// Number of pooled connections.
    pub fn len(&self) -> usize {
        self.conns.len()
    }

    /// Always `false` for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Close every connection, even after a failure.
    ///
    /// The pool's own handles are released. Clones of the pool still held
    /// elsewhere keep their handles. All failures are returned together in
    /// [`Error::CloseAll`].
    pub fn close(self) -> Result<(), Error> {
        let conns = Arc::unwrap_or_clone(self.conns);
        let total = conns.len();

        let errors: Vec<Error> = conns
            .into_iter()
            .enumerate()
            .filter_map(|(index, conn)| {
                conn.close()
                    .inspect_err(|e| debug!(index, error = %e, "Failed to close pooled connection"))
                    .err()
                    .map(Error::Close)
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::CloseAll { total, errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockConn;
    use proptest::prelude::*;

    fn conns(n: usize) -> Vec<MockConn> {
        (0..n).map(MockConn::new).collect()
    }

    #[test]
    fn test_first_call_returns_second_connection() {
        let c = conns(2);
        let pool = RoundRobinConnPool::new(c.clone());

        assert_eq!(pool.conn(), c[1]);
        assert_eq!(pool.conn(), c[0]);
        assert_eq!(pool.conn(), c[1]);
        assert_eq!(pool.conn(), c[0]);
    }

    #[test]
    fn test_clones_share_cursor() {
        let c = conns(3);
        let pool = RoundRobinConnPool::new(c.clone());
        let other = pool.clone();

        assert_eq!(pool.conn(), c[1]);
        assert_eq!(other.conn(), c[2]);
        assert_eq!(pool.conn(), c[0]);
    }

    #[test]
    fn test_close_visits_every_connection_after_failure() {
        let c = vec![
            MockConn::new(0),
            MockConn::failing_close(1),
            MockConn::new(2),
            MockConn::failing_close(3),
        ];
        let pool = RoundRobinConnPool::new(c.clone());

        let err = pool.close().unwrap_err();
        match err {
            Error::CloseAll { total, errors } => {
                assert_eq!(total, 4);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        for conn in &c {
            assert_eq!(conn.close_count(), 1);
        }
    }

    #[test]
    fn test_close_ok_when_all_succeed() {
        let c = conns(4);
        let pool = RoundRobinConnPool::new(c.clone());

        assert!(pool.close().is_ok());
        assert!(c.iter().all(|conn| conn.close_count() == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_selection_is_uniform() {
        const TASKS: usize = 8;
        const CALLS_PER_TASK: usize = 300;

        let c = conns(3);
        let pool = RoundRobinConnPool::new(c.clone());

        let handles: Vec<_> = (0..TASKS)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    (0..CALLS_PER_TASK).map(|_| pool.conn().id()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut hits = [0usize; 3];
        for result in futures::future::join_all(handles).await {
            for id in result.unwrap() {
                hits[id] += 1;
            }
        }

        // No lost or duplicated increments: every connection is picked equally.
        assert_eq!(hits, [TASKS * CALLS_PER_TASK / 3; 3]);
    }

    proptest! {
        #[test]
        fn prop_mth_call_selects_m_mod_k(k in 2usize..16, m in 1usize..200) {
            let c = conns(k);
            let pool = RoundRobinConnPool::new(c.clone());

            let mut last = None;
            for _ in 0..m {
                last = Some(pool.conn());
            }
            prop_assert_eq!(last.unwrap(), c[m % k].clone());
        }
    }
}
