//! 首页：上传表单与分页文件列表页面。

use axum::extract::Extension;
use axum::response::Html;
use std::sync::Arc;

use crate::counter::UploadCounter;
use crate::error::ApiError;
use crate::storage::Storage;

/// 渲染首页，嵌入当前文件数与累计上传数。
pub async fn index_page(
    Extension(storage): Extension<Arc<Storage>>,
    Extension(counter): Extension<Arc<UploadCounter>>,
) -> Result<Html<String>, ApiError> {
    let total_files = storage
        .count_files()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let total_uploads = counter.get().await;
    Ok(Html(render_index(total_files, total_uploads)))
}

fn render_index(total_files: u64, total_uploads: u64) -> String {
    format!(
        r#"<html>
    <head>
        <title>updrop</title>
    </head>
    <body>
        <h2>Upload File</h2>
        <form action="/upload" method="post" enctype="multipart/form-data">
            <input type="file" name="file">
            <input type="submit" value="Upload">
        </form>
        <h3>Uploaded Files ({total_files} stored, {total_uploads} all time):</h3>
        <ul id="file-list"></ul>
        <button onclick="loadMore()">Load More</button>
        <script>
            let page = 1;
            let limit = 10;

            async function fetchFiles() {{
                let response = await fetch(`/files?limit=${{limit}}&page=${{page}}`);
                let data = await response.json();
                let fileList = document.getElementById("file-list");
                data.files.forEach(f => {{
                    let li = document.createElement("li");
                    li.innerHTML = `<a href="${{f.url}}" target="_blank">${{f.filename}}</a>`;
                    fileList.appendChild(li);
                }});
            }}

            function loadMore() {{
                page++;
                fetchFiles();
            }}

            fetchFiles();
        </script>
    </body>
</html>
"#
    )
}
