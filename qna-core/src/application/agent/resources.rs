use super::errors::SetupError;
use crate::application::tooling::ProtocolClient;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Reads a JSON configuration resource and decodes its first text block.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    protocol: &dyn ProtocolClient,
    uri: &str,
) -> Result<T, SetupError> {
    let result = protocol
        .read_resource(uri)
        .await
        .map_err(|source| SetupError::Resource {
            uri: uri.to_string(),
            source,
        })?;
    let text = result.first_text().ok_or_else(|| SetupError::EmptyResource {
        uri: uri.to_string(),
    })?;
    debug!(uri, bytes = text.len(), "decoding configuration resource");
    serde_json::from_str(text).map_err(|source| SetupError::Malformed {
        uri: uri.to_string(),
        source,
    })
}
