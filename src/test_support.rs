//! Scripted connections and dialer for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::connection::Connection;
use crate::dialer::{Dialer, Security};
use crate::error::{BoxError, DialError};
use crate::options::DialOption;

#[derive(Debug, Clone)]
pub(crate) struct MockConn {
    id: usize,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl MockConn {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            closes: Arc::new(AtomicUsize::new(0)),
            fail_close: false,
        }
    }

    pub(crate) fn failing_close(id: usize) -> Self {
        Self {
            fail_close: true,
            ..Self::new(id)
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl PartialEq for MockConn {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.closes, &other.closes)
    }
}

impl Connection for MockConn {
    fn close(self) -> Result<(), BoxError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(format!("close failed for conn {}", self.id).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DialCall {
    pub endpoint: String,
    pub security: Security,
    pub options: Vec<&'static str>,
}

/// Hands out fresh [`MockConn`]s, numbered from 0 in dial order.
#[derive(Debug, Default)]
pub(crate) struct MockDialer {
    /// 1-based dial attempt that fails.
    fail_at: Option<usize>,
    /// 1-based dial attempt that cancels the token before returning.
    cancel_at: Option<usize>,
    fail_close: bool,
    attempts: AtomicUsize,
    calls: Mutex<Vec<DialCall>>,
    conns: Mutex<Vec<MockConn>>,
}

impl MockDialer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_at(attempt: usize) -> Self {
        Self {
            fail_at: Some(attempt),
            ..Self::default()
        }
    }

    pub(crate) fn cancelling_at(attempt: usize) -> Self {
        Self {
            cancel_at: Some(attempt),
            ..Self::default()
        }
    }

    /// Connections produced by this dialer fail to close.
    pub(crate) fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<DialCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn conns(&self) -> Vec<MockConn> {
        self.conns.lock().unwrap().clone()
    }
}

impl Dialer for MockDialer {
    type Conn = MockConn;

    async fn dial(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        security: Security,
        options: &[DialOption],
    ) -> Result<MockConn, DialError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().unwrap().push(DialCall {
            endpoint: endpoint.to_string(),
            security,
            options: options.iter().map(DialOption::name).collect(),
        });

        if self.cancel_at == Some(attempt) {
            cancel.cancel();
        }
        if cancel.is_cancelled() {
            return Err(DialError::Cancelled);
        }
        if self.fail_at == Some(attempt) {
            return Err(DialError::Other(format!("dial {attempt} refused").into()));
        }

        let id = attempt - 1;
        let conn = if self.fail_close {
            MockConn::failing_close(id)
        } else {
            MockConn::new(id)
        };
        self.conns.lock().unwrap().push(conn.clone());
        Ok(conn)
    }
}
