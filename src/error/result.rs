//! Result type alias for client operations.

use super::client_error::ClientError;

/// Type alias for Results using ClientError.
///
/// # Example
///
/// ```ignore
/// use lingua::error::ClientResult;
///
/// async fn folders(client: &ApiClient) -> ClientResult<Vec<Folder>> {
///     client.get_json("/api/flashcard-folders/user").await
/// }
/// ```
pub type ClientResult<T> = Result<T, ClientError>;
