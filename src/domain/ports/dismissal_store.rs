use crate::domain::errors::StorageResult;

/// Repository interface for the persisted load-prompt dismissal
///
/// The store is read once when a session starts and written only when the
/// visitor closes the load prompt. Access is synchronous; implementations
/// must be cheap enough to call from a presentation callback.
///
/// Concurrent writers (two open tabs) are not coordinated: the value only
/// ever moves from false to true, so last write wins.
pub trait DismissalStore: Send + Sync {
    /// Read the stored flag
    ///
    /// # Returns
    /// * `Ok(true)` if the visitor has dismissed the load prompt before
    /// * `Ok(false)` if nothing has been recorded yet
    /// * `Err(StorageError)` if the backing store cannot be read
    fn read(&self) -> StorageResult<bool>;

    /// Persist the flag
    ///
    /// # Arguments
    /// * `has_seen_load_prompt` - The value to store
    fn write(&self, has_seen_load_prompt: bool) -> StorageResult<()>;
}
