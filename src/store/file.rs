use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::MarketState;
use crate::store::{StateRepository, StoreError};

/// Storage key the market state blob is kept under.
pub const MARKET_STATE_KEY: &str = "insightboard_market_state";

/// Local JSON-blob storage, one file per key inside `dir`.
///
/// A blob that is missing, unparsable or fails validation reads as "nothing
/// stored" so the caller regenerates instead of failing.
pub struct FileStateRepository {
    path: PathBuf,
}

impl FileStateRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, MARKET_STATE_KEY)
    }

    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn load(&self) -> Result<Option<MarketState>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!("Failed to read market state from {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        let state: MarketState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding malformed market state in {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        if let Err(reason) = state.validate() {
            warn!("Discarding invalid market state in {}: {}", self.path.display(), reason);
            return Ok(None);
        }

        Ok(Some(state))
    }

    async fn save(&self, state: &MarketState) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let body = serde_json::to_vec_pretty(state)?;

        // Write then rename so a crash never leaves a half-written blob.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        info!("Saved market state to {}", self.path.display());
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "insightboard-file-repo-{}-{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_round_trips_through_disk() {
        let dir = temp_dir("roundtrip");
        let repo = FileStateRepository::new(&dir);
        assert!(repo.load().await.unwrap().is_none());

        let state = MarketState::fresh(1_700_000_000_000);
        repo.save(&state).await.unwrap();
        assert!(repo.path().ends_with("insightboard_market_state.json"));
        assert_eq!(repo.load().await.unwrap(), Some(state));

        repo.reset().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
        // resetting twice is fine
        repo.reset().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_blob_reads_as_empty() {
        let dir = temp_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let repo = FileStateRepository::new(&dir);

        std::fs::write(repo.path(), "{not json").unwrap();
        assert!(repo.load().await.unwrap().is_none());

        std::fs::write(repo.path(), r#"{"seed": 5, "basePrices": {}}"#).unwrap();
        assert!(repo.load().await.unwrap().is_none());

        std::fs::write(
            repo.path(),
            r#"{"seed": 5, "startTime": 1700000000000, "basePrices": {"bitcoin": 0}}"#,
        )
        .unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_accepts_hand_written_blob() {
        let dir = temp_dir("handwritten");
        std::fs::create_dir_all(&dir).unwrap();
        let repo = FileStateRepository::new(&dir);

        std::fs::write(
            repo.path(),
            r#"{"seed": 42, "startTime": 1700000000000, "basePrices": {"bitcoin": 50000.0}}"#,
        )
        .unwrap();
        let state = repo.load().await.unwrap().unwrap();
        assert_eq!(state.seed, 42);
        assert_eq!(state.base_price("bitcoin"), Some(50000.0));
    }
}
