use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::FileKind;

fn file_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "File not found",
    ))
}

/// Content-Disposition 中的文件名去掉引号与控制字符
fn disposition_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

pub async fn download_file(
    service: &FileService,
    request: &HttpRequest,
    token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let file = match storage.get_file_by_token(&token).await {
        Ok(Some(file)) => file,
        Ok(None) => return Ok(file_not_found()),
        Err(e) => return Ok(internal_error(format!("File query failed: {e}"))),
    };

    let path = Path::new(&AppConfig::get().upload.dir).join(&file.stored_name);
    let body = match std::fs::read(&path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File {} is recorded but missing on disk", file.stored_name);
            return Ok(file_not_found());
        }
        Err(e) => {
            return Ok(internal_error(
                SchoolError::file_operation(format!("Failed to read file: {e}")).to_string(),
            ));
        }
    };

    let content_type = Path::new(&file.stored_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| FileKind::from_extension(&format!(".{ext}")))
        .map(|kind| kind.content_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                disposition_name(&file.original_name)
            ),
        ))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_name() {
        assert_eq!(disposition_name("plan.pdf"), "plan.pdf");
        assert_eq!(disposition_name("a\"b\r\n.pdf"), "ab.pdf");
        assert_eq!(disposition_name(""), "download");
    }
}
