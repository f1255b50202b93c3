//! 上传成功后触发的过期文件清理任务。

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::storage::Storage;

/// 派发一次后台保留清理，不阻塞上传响应。
pub fn spawn_retention_sweep(storage: Arc<Storage>, max_age: Duration) {
    tokio::spawn(async move {
        match storage.remove_stale(max_age).await {
            Ok(0) => {}
            Ok(removed) => info!(removed, "retention sweep finished"),
            Err(err) => warn!(error = %err, "retention sweep failed"),
        }
    });
}
