use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    // Filenames are used verbatim as storage keys; uploading an existing
    // name overwrites the previous content.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub async fn save(&self, filename: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let target = self.file_path(filename);
        fs::write(&target, contents).await?;
        Ok(target)
    }

    pub async fn list_files(&self) -> io::Result<Vec<StoredFile>> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
            entries.push(StoredFile {
                name,
                size: metadata.len(),
                modified,
            });
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(entries)
    }

    pub async fn count_files(&self) -> io::Result<u64> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut count = 0;
        while let Some(entry) = dir.next_entry().await? {
            if entry.metadata().await?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    pub async fn remove_stale(&self, max_age: Duration) -> io::Result<u64> {
        let now = SystemTime::now();
        let mut dir = fs::read_dir(&self.root).await?;
        let mut removed = 0;

        while let Some(entry) = dir.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(value) => value,
                Err(_) => continue,
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = match metadata.modified() {
                Ok(value) => value,
                Err(_) => continue,
            };
            let age = match now.duration_since(modified) {
                Ok(value) => value,
                Err(_) => continue,
            };
            if age > max_age {
                let path = entry.path();
                if let Err(err) = fs::remove_file(&path).await {
                    warn!(path = ?path, error = %err, "failed to remove stale file");
                } else {
                    info!(path = ?path, "removed stale file");
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}

pub fn format_timestamp(timestamp: SystemTime) -> Option<String> {
    timestamp.duration_since(UNIX_EPOCH).ok().map(|duration| {
        let datetime: DateTime<Utc> = (UNIX_EPOCH + duration).into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    })
}

#[derive(Debug)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::Storage;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn make_storage() -> (tempfile::TempDir, Storage) {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("uploads");
        std::fs::create_dir_all(&root).expect("create storage root");
        (temp, Storage::new(root))
    }

    fn backdate(path: &std::path::Path, age: Duration) {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .expect("open file");
        file.set_modified(SystemTime::now() - age).expect("set mtime");
    }

    #[tokio::test]
    async fn save_overwrites_existing_file() {
        let (_temp, storage) = make_storage();
        storage.save("a.txt", b"one").await.expect("save");
        storage.save("a.txt", b"two").await.expect("save again");

        let contents = tokio::fs::read(storage.file_path("a.txt"))
            .await
            .expect("read");
        assert_eq!(contents, b"two");
        assert_eq!(storage.count_files().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn list_files_sorts_newest_first() {
        let (_temp, storage) = make_storage();
        storage.save("old.txt", b"old").await.expect("save");
        storage.save("new.txt", b"new").await.expect("save");
        backdate(&storage.file_path("old.txt"), Duration::from_secs(3600));

        let entries = storage.list_files().await.expect("list");
        let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["new.txt", "old.txt"]);
    }

    #[tokio::test]
    async fn remove_stale_only_removes_files_past_the_window() {
        let (_temp, storage) = make_storage();
        storage.save("stale.txt", b"stale").await.expect("save");
        storage.save("fresh.txt", b"fresh").await.expect("save");
        std::fs::create_dir_all(storage.root_path().join("nested")).expect("mkdir");
        backdate(
            &storage.file_path("stale.txt"),
            Duration::from_secs(4 * 24 * 60 * 60),
        );

        let removed = storage
            .remove_stale(Duration::from_secs(3 * 24 * 60 * 60))
            .await
            .expect("sweep");

        assert_eq!(removed, 1);
        assert!(
            tokio::fs::metadata(storage.file_path("stale.txt"))
                .await
                .is_err()
        );
        assert!(
            tokio::fs::metadata(storage.file_path("fresh.txt"))
                .await
                .is_ok()
        );
        assert!(
            tokio::fs::metadata(storage.root_path().join("nested"))
                .await
                .is_ok()
        );
    }
}
