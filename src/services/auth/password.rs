use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::auth::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
};
use crate::models::notifications::requests::NewNotification;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::revoke_sessions;
use crate::storage::Storage;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::random_code::{RESET_TOKEN_LENGTH, generate_token};
use crate::utils::validate::validate_password;

use super::AuthService;

/// 密码变更后给本人发一条提醒，失败只记日志
async fn notify_password_changed(storage: &Arc<dyn Storage>, user_id: i64, via_reset: bool) {
    let content = if via_reset {
        "Your password was reset with a recovery token. Contact an administrator if this was not you."
    } else {
        "Your password was changed. Contact an administrator if this was not you."
    };
    let notice = NewNotification {
        user_id,
        title: "Password changed".to_string(),
        content: content.to_string(),
        link: None,
    };
    if let Err(e) = storage.create_notification(notice).await {
        tracing::warn!("Failed to notify user {} about password change: {}", user_id, e);
    }
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    // 缓存里的会话用户不带密码哈希，需重新读取
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load user: {e}"),
                )),
            );
        }
    };

    if !verify_password(&change_request.current_password, &user.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        )));
    }

    if let Err(msg) = validate_password(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let password_hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to change password",
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(_)) => {
            revoke_sessions(request, user_id).await;
            notify_password_changed(&storage, user_id, false).await;
            tracing::info!("User {} changed password", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password changed successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to change password: {e}"),
            )),
        ),
    }
}

/// 无论邮箱是否存在都返回 200
pub async fn handle_forgot_password(
    service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let accepted = || {
        HttpResponse::Ok().json(ApiResponse::success_empty(
            "If the email is registered, password reset instructions have been sent",
        ))
    };

    let email = forgot_request.email.trim();
    if email.is_empty() {
        return Ok(accepted());
    }

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_email(email).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => {
            tracing::debug!("Password reset requested for unknown or inactive account");
            return Ok(accepted());
        }
        Err(e) => {
            tracing::error!("Password reset lookup failed: {}", e);
            return Ok(accepted());
        }
    };

    let ttl = service.get_config().password_reset.token_ttl_minutes;
    let token = generate_token(RESET_TOKEN_LENGTH);
    let expires_at = (chrono::Utc::now() + chrono::Duration::minutes(ttl)).timestamp();

    match storage
        .create_password_reset_token(user.id, &token, expires_at)
        .await
    {
        Ok(record) => {
            // 投递渠道：日志
            tracing::info!(
                target: "password_reset",
                user_id = user.id,
                email = %user.email,
                token = %token,
                expires_at = %record.expires_at,
                "Password reset token issued"
            );
        }
        Err(e) => tracing::error!("Failed to store password reset token: {}", e),
    }

    Ok(accepted())
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let invalid_token = || {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordResetTokenInvalid,
            "Reset token is invalid or expired",
        ))
    };

    if let Err(msg) = validate_password(&reset_request.new_password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let storage = service.get_storage(request);
    let record = match storage
        .get_password_reset_token(reset_request.token.trim())
        .await
    {
        Ok(Some(record)) if record.is_usable(chrono::Utc::now()) => record,
        Ok(_) => return Ok(invalid_token()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to verify reset token: {e}"),
                )),
            );
        }
    };

    let password_hash = match hash_password(&reset_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to reset password",
                )),
            );
        }
    };

    match storage
        .consume_password_reset_token(record.id, record.user_id, &password_hash)
        .await
    {
        Ok(true) => {
            revoke_sessions(request, record.user_id).await;
            notify_password_changed(&storage, record.user_id, true).await;
            tracing::info!("Password reset completed for user {}", record.user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password has been reset",
            )))
        }
        // 并发请求已先一步使用了该令牌
        Ok(false) => Ok(invalid_token()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to reset password: {e}"),
            )),
        ),
    }
}
