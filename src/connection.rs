use tonic::transport::Channel;

use crate::error::BoxError;

/// A live transport handle that can issue RPCs and be released explicitly.
///
/// Implementations must be safe to share between concurrent callers; the pool
/// hands out clones of the same handle without any per-connection locking.
pub trait Connection: Clone + Send + Sync + 'static {
    /// Release the underlying transport resources held by this handle.
    fn close(self) -> Result<(), BoxError>;
}

/// A tonic [`Channel`] has no shutdown hook; closing drops the handle. The
/// HTTP/2 connection ends once the last clone is gone, so clones handed out
/// earlier keep it open until they are dropped too.
impl Connection for Channel {
    fn close(self) -> Result<(), BoxError> {
        drop(self);
        Ok(())
    }
}
