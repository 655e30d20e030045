//! Persistence of computed covers, keyed by region.
//!
//! Records never expire. A cover for a region stays valid until its record is
//! removed by hand (delete the `<key>.json` file for [`FileCoverCache`]); a
//! changed region produces a different key and therefore a fresh computation.
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::LatLon;

/// Storage for computed covers.
pub trait CoverCache {
    /// Returns the stored cover for `key`, `Ok(None)` when there is none.
    fn load(&self, key: &str) -> Result<Option<Vec<LatLon>>>;

    /// Stores `cover` under `key`, replacing any previous record.
    fn store(&mut self, key: &str, cover: &[LatLon]) -> Result<()>;
}

/// Cache that never remembers anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CoverCache for NoCache {
    fn load(&self, _key: &str) -> Result<Option<Vec<LatLon>>> {
        Ok(None)
    }

    fn store(&mut self, _key: &str, _cover: &[LatLon]) -> Result<()> {
        Ok(())
    }
}

/// In-process cache, mainly for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCoverCache {
    records: HashMap<String, Vec<LatLon>>,
}

impl MemoryCoverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<LatLon>> {
        self.records.remove(key)
    }
}

impl CoverCache for MemoryCoverCache {
    fn load(&self, key: &str) -> Result<Option<Vec<LatLon>>> {
        Ok(self.records.get(key).cloned())
    }

    fn store(&mut self, key: &str, cover: &[LatLon]) -> Result<()> {
        self.records.insert(key.to_owned(), cover.to_vec());
        Ok(())
    }
}

/// On-disk layout of one record.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    key: String,
    points: Vec<(f64, f64)>,
}

/// One JSON file per region inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written record.
#[derive(Debug, Clone)]
pub struct FileCoverCache {
    dir: PathBuf,
}

impl FileCoverCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CoverCache for FileCoverCache {
    fn load(&self, key: &str) -> Result<Option<Vec<LatLon>>> {
        let path = self.record_path(key);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CacheRecord =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::CorruptCache {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if record.key != key {
            return Err(Error::CorruptCache {
                path,
                reason: format!("record holds key '{}'", record.key),
            });
        }

        debug!("Loaded {} cached scan points from {}.", record.points.len(), path.display());
        Ok(Some(record.points.into_iter().map(LatLon::from).collect()))
    }

    fn store(&mut self, key: &str, cover: &[LatLon]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        let record = CacheRecord {
            key: key.to_owned(),
            points: cover.iter().map(|&p| p.into()).collect(),
        };
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &record)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!("Stored {} scan points in {}.", cover.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::rand01;

    fn random_cover(n: usize, seed: u64) -> Vec<LatLon> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| LatLon::new(rand01(&mut rng) * 180.0 - 90.0, rand01(&mut rng) * 360.0 - 180.0))
            .collect()
    }

    #[test]
    fn file_round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCoverCache::new(dir.path());
        let cover = random_cover(500, 77);

        cache.store("region", &cover).unwrap();
        let back = cache.load("region").unwrap().unwrap();

        assert_eq!(back.len(), cover.len());
        for (a, b) in cover.iter().zip(&back) {
            assert_eq!(a.lat.to_bits(), b.lat.to_bits());
            assert_eq!(a.lon.to_bits(), b.lon.to_bits());
        }
        assert!(!dir.path().join("region.json.tmp").exists());
    }

    #[test]
    fn missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCoverCache::new(dir.path().join("not-yet-created"));
        assert!(cache.load("anything").unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCoverCache::new(dir.path());
        fs::write(cache.record_path("broken"), b"{\"key\": \"broken\", \"points\": [[1.0").unwrap();
        assert!(matches!(
            cache.load("broken"),
            Err(Error::CorruptCache { .. })
        ));
    }

    #[test]
    fn record_under_wrong_name_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCoverCache::new(dir.path());
        cache.store("a", &[LatLon::new(1.0, 2.0)]).unwrap();
        fs::rename(cache.record_path("a"), cache.record_path("b")).unwrap();
        assert!(matches!(cache.load("b"), Err(Error::CorruptCache { .. })));
    }

    #[test]
    fn store_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCoverCache::new(dir.path());
        cache.store("k", &[LatLon::new(1.0, 2.0)]).unwrap();
        cache.store("k", &[LatLon::new(3.0, 4.0), LatLon::new(5.0, 6.0)]).unwrap();
        assert_eq!(
            cache.load("k").unwrap().unwrap(),
            vec![LatLon::new(3.0, 4.0), LatLon::new(5.0, 6.0)]
        );
    }

    #[test]
    fn memory_cache_round_trip() {
        let mut cache = MemoryCoverCache::new();
        assert!(cache.load("k").unwrap().is_none());
        cache.store("k", &[LatLon::new(1.5, -2.5)]).unwrap();
        assert_eq!(cache.load("k").unwrap(), Some(vec![LatLon::new(1.5, -2.5)]));
        assert_eq!(cache.remove("k").map(|v| v.len()), Some(1));
        assert!(cache.is_empty());
    }
}
