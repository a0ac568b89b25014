use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use super::get::load_teacher;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        requests::{UpdateTeacherRequest, UpdateUserRequest},
        responses::UserResponse,
    },
};
use crate::services::{forget_session, revoke_sessions};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone};

pub async fn update_teacher(
    service: &TeacherService,
    teacher_id: i64,
    update_data: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_teacher(&storage, teacher_id).await {
        return Ok(resp);
    }

    let email = update_data.email.map(|e| e.trim().to_string());
    if let Some(email) = email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Some(phone) = update_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let password = match update_data.password {
        Some(password) => {
            if let Err(msg) = validate_password(&password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
            }
            match hash_password(&password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Password hashing failed: {e}"),
                        )),
                    );
                }
            }
        }
        None => None,
    };

    let password_changed = password.is_some();
    let update = UpdateUserRequest {
        email,
        password,
        status: update_data.status,
        display_name: update_data.display_name,
        phone: update_data.phone,
    };

    match storage.update_user(teacher_id, update).await {
        Ok(Some(user)) => {
            if password_changed {
                revoke_sessions(request, teacher_id).await;
            } else {
                forget_session(request, teacher_id).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Teacher updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update teacher: {e}"),
            )),
        ),
    }
}
