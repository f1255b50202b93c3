//! 累计上传计数的持久化。

use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use crate::storage::Storage;

#[derive(Debug)]
pub struct UploadCounter {
    path: PathBuf,
    value: Mutex<u64>,
}

impl UploadCounter {
    /// 加载计数文件；缺失或损坏时以当前存储的文件数为起点。
    pub async fn load(path: PathBuf, storage: &Storage) -> io::Result<Self> {
        let value = match fs::read_to_string(&path).await {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(path = ?path, "counter file is not a number, reseeding from file count");
                    storage.count_files().await?
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => storage.count_files().await?,
            Err(err) => return Err(err),
        };
        Ok(Self {
            path,
            value: Mutex::new(value),
        })
    }

    pub async fn get(&self) -> u64 {
        *self.value.lock().await
    }

    /// 自增并写回计数文件，返回新值。
    pub async fn increment(&self) -> io::Result<u64> {
        let mut value = self.value.lock().await;
        *value += 1;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, format!("{}\n", *value)).await?;
        Ok(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::UploadCounter;
    use crate::storage::Storage;
    use tempfile::tempdir;

    fn make_storage(temp: &tempfile::TempDir) -> Storage {
        let root = temp.path().join("uploads");
        std::fs::create_dir_all(&root).expect("create storage root");
        Storage::new(root)
    }

    #[tokio::test]
    async fn load_seeds_from_file_count_when_counter_missing() {
        let temp = tempdir().expect("tempdir");
        let storage = make_storage(&temp);
        storage.save("a.txt", b"a").await.expect("save");
        storage.save("b.txt", b"b").await.expect("save");

        let counter = UploadCounter::load(temp.path().join("upload_count"), &storage)
            .await
            .expect("load");
        assert_eq!(counter.get().await, 2);
    }

    #[tokio::test]
    async fn load_reads_existing_counter_file() {
        let temp = tempdir().expect("tempdir");
        let storage = make_storage(&temp);
        let path = temp.path().join("upload_count");
        std::fs::write(&path, "41\n").expect("write counter file");

        let counter = UploadCounter::load(path, &storage).await.expect("load");
        assert_eq!(counter.get().await, 41);
        assert_eq!(counter.increment().await.expect("increment"), 42);
    }

    #[tokio::test]
    async fn load_reseeds_when_counter_file_is_garbage() {
        let temp = tempdir().expect("tempdir");
        let storage = make_storage(&temp);
        let path = temp.path().join("upload_count");
        std::fs::write(&path, "not a number").expect("write counter file");

        let counter = UploadCounter::load(path, &storage).await.expect("load");
        assert_eq!(counter.get().await, 0);
    }

    #[tokio::test]
    async fn increment_persists_across_reload() {
        let temp = tempdir().expect("tempdir");
        let storage = make_storage(&temp);
        let path = temp.path().join("upload_count");

        let counter = UploadCounter::load(path.clone(), &storage)
            .await
            .expect("load");
        assert_eq!(counter.increment().await.expect("increment"), 1);
        assert_eq!(counter.increment().await.expect("increment"), 2);
        drop(counter);

        let raw = std::fs::read_to_string(&path).expect("read counter file");
        assert_eq!(raw.trim(), "2");

        let reloaded = UploadCounter::load(path, &storage).await.expect("reload");
        assert_eq!(reloaded.get().await, 2);
    }
}
