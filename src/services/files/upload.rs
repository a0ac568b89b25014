use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, TryStreamExt};
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::{current_user, internal_error};
use crate::utils::FileKind;

fn upload_error(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 取出小写扩展名（含点号），不在白名单内时返回 None
pub(crate) fn allowed_extension(file_name: &str, allowed: &[String]) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))?;
    allowed
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&extension))
        .then_some(extension)
}

/// 已落盘的文件
struct StoredUpload {
    original_name: String,
    stored_name: String,
    size: i64,
    content_type: String,
}

/// 把 multipart 字段写入上传目录；出错时删除半成品
async fn store_field(
    mut field: Field,
    upload_dir: &str,
    max_size: usize,
    allowed: &[String],
) -> Result<StoredUpload, HttpResponse> {
    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|name| name.trim().to_string())
        .unwrap_or_default();

    let Some(extension) = allowed_extension(&original_name, allowed) else {
        return Err(upload_error(
            ErrorCode::FileTypeNotAllowed,
            "File type not allowed",
        ));
    };
    let Some(kind) = FileKind::from_extension(&extension) else {
        return Err(upload_error(
            ErrorCode::FileTypeNotAllowed,
            "File type not allowed",
        ));
    };

    let stored_name = format!("{}{extension}", Uuid::new_v4().simple());
    let file_path = Path::new(upload_dir).join(&stored_name);
    let mut file = fs::File::create(&file_path).map_err(|e| {
        internal_error(SchoolError::file_operation(format!("Failed to create file: {e}")).to_string())
    })?;

    let discard = |resp: HttpResponse| {
        let _ = fs::remove_file(&file_path);
        resp
    };

    let mut total: usize = 0;
    let mut checked = false;
    while let Some(chunk) = field.next().await {
        let data = match chunk {
            Ok(data) => data,
            Err(e) => {
                return Err(discard(upload_error(
                    ErrorCode::FileUploadFailed,
                    &format!("Upload interrupted: {e}"),
                )));
            }
        };

        // 第一个分块校验文件头
        if !checked {
            checked = true;
            if !kind.matches(&data) {
                return Err(discard(upload_error(
                    ErrorCode::FileTypeNotAllowed,
                    "File content does not match its extension",
                )));
            }
        }

        total += data.len();
        if total > max_size {
            return Err(discard(upload_error(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            )));
        }

        if let Err(e) = file.write_all(&data) {
            return Err(discard(internal_error(
                SchoolError::file_operation(format!("Failed to write file: {e}")).to_string(),
            )));
        }
    }

    if total == 0 {
        return Err(discard(upload_error(
            ErrorCode::FileUploadFailed,
            "Uploaded file is empty",
        )));
    }

    let content_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| kind.content_type().to_string());

    Ok(StoredUpload {
        original_name,
        stored_name,
        size: total as i64,
        content_type,
    })
}

pub async fn upload_file(
    service: &FileService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    if let Err(e) = fs::create_dir_all(upload_dir) {
        return Ok(internal_error(
            SchoolError::file_operation(format!("Failed to create upload directory: {e}"))
                .to_string(),
        ));
    }

    let mut stored: Option<StoredUpload> = None;
    while let Ok(Some(field)) = payload.try_next().await {
        let is_file = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .is_some_and(|name| name == "file");
        if !is_file {
            continue;
        }

        if let Some(previous) = &stored {
            let _ = fs::remove_file(Path::new(upload_dir).join(&previous.stored_name));
            return Ok(upload_error(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        match store_field(field, upload_dir, config.upload.max_size, &config.upload.allowed_types)
            .await
        {
            Ok(upload) => stored = Some(upload),
            Err(resp) => return Ok(resp),
        }
    }

    let Some(upload) = stored else {
        return Ok(upload_error(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let storage = service.get_storage(request);
    match storage
        .upload_file(
            &upload.original_name,
            &upload.stored_name,
            &upload.size,
            &upload.content_type,
            user.id,
        )
        .await
    {
        Ok(file) => {
            tracing::info!(
                "User {} uploaded {} ({} bytes)",
                user.username,
                file.original_name,
                file.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse {
                    download_token: file.download_token,
                    file_name: file.original_name,
                    size: file.file_size,
                    content_type: file.file_type,
                    created_at: file.created_at,
                },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(Path::new(upload_dir).join(&upload.stored_name));
            Ok(internal_error(format!("Failed to record uploaded file: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![".pdf".to_string(), ".CSV".to_string(), ".docx".to_string()]
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(
            allowed_extension("Week 3 plan.PDF", &allowed()),
            Some(".pdf".to_string())
        );
        assert_eq!(
            allowed_extension("timetable.csv", &allowed()),
            Some(".csv".to_string())
        );
    }

    #[test]
    fn test_rejected_extension() {
        assert_eq!(allowed_extension("run.exe", &allowed()), None);
        assert_eq!(allowed_extension("no_extension", &allowed()), None);
        assert_eq!(allowed_extension("", &allowed()), None);
    }
}
