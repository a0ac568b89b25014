pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;
use std::sync::Arc;

use crate::models::files::entities::File;
use crate::storage::Storage;

/// 删除记录对应的磁盘文件，返回实际删除的数量；文件已不存在时忽略
pub(crate) fn remove_stored_files(dir: &Path, files: &[File]) -> usize {
    let mut removed = 0;
    for file in files {
        match std::fs::remove_file(dir.join(&file.stored_name)) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove stored file {}: {}", file.stored_name, e),
        }
    }
    removed
}

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 上传附件（教案、课表等），返回下载令牌
    pub async fn upload_file(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_file(self, request, payload).await
    }

    /// 按令牌下载，文件名使用上传时的原始名称
    pub async fn download_file(
        &self,
        request: &HttpRequest,
        token: String,
    ) -> ActixResult<HttpResponse> {
        download::download_file(self, request, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stored_name: &str) -> File {
        File {
            download_token: uuid::Uuid::new_v4().simple().to_string(),
            original_name: "plan.pdf".to_string(),
            stored_name: stored_name.to_string(),
            file_size: 3,
            file_type: "application/pdf".to_string(),
            user_id: 7,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_remove_stored_files_skips_missing() {
        let dir = std::env::temp_dir().join(format!("school-files-{}", uuid::Uuid::new_v4().simple()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.pdf"), b"abc").unwrap();

        let removed = remove_stored_files(&dir, &[record("a.pdf"), record("gone.pdf")]);
        assert_eq!(removed, 1);
        assert!(!dir.join("a.pdf").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
