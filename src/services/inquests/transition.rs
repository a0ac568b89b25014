use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{InquestService, load_visible_inquest};
use crate::models::inquests::{
    entities::{Inquest, InquestTransition, TransitionError, check_transition},
    requests::UpdateInquestStatusRequest,
};
use crate::models::notifications::requests::NewNotification;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

/// 迁移后要通知的一方：回复通知发起的管理员，结案通知教师
fn transition_notice(inquest: &Inquest, transition: &InquestTransition, actor: &User) -> NewNotification {
    let link = Some(format!("/inquests/{}", inquest.id));
    match transition {
        InquestTransition::Respond { .. } => NewNotification {
            user_id: inquest.created_by,
            title: format!("Inquest responded: {}", inquest.subject),
            content: format!("{} responded to the inquest.", actor.name()),
            link,
        },
        InquestTransition::Complete { decision } => NewNotification {
            user_id: inquest.teacher_id,
            title: format!("Inquest completed: {}", inquest.subject),
            content: format!("Decision: {decision}"),
            link,
        },
    }
}

pub async fn transition_inquest(
    service: &InquestService,
    request: &HttpRequest,
    inquest_id: i64,
    data: UpdateInquestStatusRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let inquest = match load_visible_inquest(&storage, &user, inquest_id).await {
        Ok(inquest) => inquest,
        Err(resp) => return Ok(resp),
    };

    let transition = match check_transition(
        inquest.status,
        data.status,
        &user.role,
        inquest.teacher_id == user.id,
        data.response.as_deref(),
        data.decision.as_deref(),
    ) {
        Ok(transition) => transition,
        Err(TransitionError::Forbidden(msg)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::InquestPermissionDenied,
                msg,
            )));
        }
        Err(TransitionError::Invalid(msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InquestTransitionInvalid,
                msg,
            )));
        }
    };

    let notification = transition_notice(&inquest, &transition, &user);
    let target = transition.to_status();

    match storage
        .transition_inquest(inquest_id, transition, notification)
        .await
    {
        Ok(Some(updated)) => {
            tracing::info!(
                "Inquest {} moved to {} by {}",
                inquest_id,
                target,
                user.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Inquest status updated successfully",
            )))
        }
        // 读取后状态已被并发修改
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InquestTransitionInvalid,
            "Inquest status changed, reload and retry",
        ))),
        Err(e) => Ok(internal_error(format!("Inquest status update failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquests::entities::InquestStatus;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn actor(id: i64, role: UserRole, display_name: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: Some(display_name.to_string()),
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn inquest() -> Inquest {
        let now = chrono::Utc::now();
        Inquest {
            id: 12,
            teacher_id: 5,
            created_by: 1,
            subject: "Missing lesson log".to_string(),
            description: "No log for Monday".to_string(),
            lesson_id: None,
            status: InquestStatus::Pending,
            response: None,
            responded_at: None,
            decision: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_response_notifies_creator() {
        let notice = transition_notice(
            &inquest(),
            &InquestTransition::Respond {
                response: "I was ill".to_string(),
            },
            &actor(5, UserRole::Teacher, "Ms. Reed"),
        );
        assert_eq!(notice.user_id, 1);
        assert!(notice.content.contains("Ms. Reed"));
        assert_eq!(notice.link.as_deref(), Some("/inquests/12"));
    }

    #[test]
    fn test_completion_notifies_teacher() {
        let notice = transition_notice(
            &inquest(),
            &InquestTransition::Complete {
                decision: "No further action".to_string(),
            },
            &actor(1, UserRole::Admin, "Principal"),
        );
        assert_eq!(notice.user_id, 5);
        assert!(notice.content.contains("No further action"));
    }
}
