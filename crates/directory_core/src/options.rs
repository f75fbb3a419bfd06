//! Selectable filter values. Region codes are a fixed list (see
//! [`shared::domain::REGION_CODES`]); party codes come from one request.

use shared::error::DirectoryError;
use tracing::{info, warn};

use crate::DirectorySource;

/// Fetches the party list once and returns its codes sorted and unique.
pub async fn load_party_codes(
    source: &dyn DirectorySource,
) -> Result<Vec<String>, DirectoryError> {
    match source.fetch_party_codes().await {
        Ok(codes) => {
            let codes = normalize_codes(codes);
            info!(count = codes.len(), "options: party list loaded");
            Ok(codes)
        }
        Err(err) => {
            let err = err.into_options_load();
            warn!(code = err.code().as_str(), "options: {err}");
            Err(err)
        }
    }
}

fn normalize_codes(codes: Vec<String>) -> Vec<String> {
    let mut codes: Vec<String> = codes
        .into_iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}
