use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;

use super::AnnouncementService;
use crate::models::announcements::{
    entities::AnnouncementType,
    requests::{CreateAnnouncementRequest, NewAnnouncement},
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

/// 公告投递对象
///
/// `GENERAL` 投递给全部教师，忽略 `requested`；`TARGETED` 与 `DRAW_ATTENTION`
/// 只投递给提交的教师 ID，列表不能为空且必须都是教师。重复 ID 合并。
pub fn resolve_recipients(
    kind: AnnouncementType,
    requested: Option<&[i64]>,
    teacher_ids: &[i64],
) -> Result<Vec<i64>, String> {
    let teachers: BTreeSet<i64> = teacher_ids.iter().copied().collect();

    if !kind.is_targeted() {
        return Ok(teachers.into_iter().collect());
    }

    let requested: BTreeSet<i64> = requested.unwrap_or_default().iter().copied().collect();
    if requested.is_empty() {
        return Err(format!("{kind} announcements require recipient_ids"));
    }

    let unknown: Vec<String> = requested
        .difference(&teachers)
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(format!(
            "recipient_ids are not teachers: {}",
            unknown.join(", ")
        ));
    }

    Ok(requested.into_iter().collect())
}

pub async fn create_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    data: CreateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let title = data.title.trim().to_string();
    let content = data.content.trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "title and content are required",
        )));
    }

    let storage = service.get_storage(request);
    let teacher_ids = match storage.list_user_ids_by_role(UserRole::Teacher).await {
        Ok(ids) => ids,
        Err(e) => return Ok(internal_error(format!("Failed to list teachers: {e}"))),
    };

    let recipients = match resolve_recipients(
        data.announcement_type,
        data.recipient_ids.as_deref(),
        &teacher_ids,
    ) {
        Ok(ids) => ids,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::AnnouncementRecipientsInvalid,
                msg,
            )));
        }
    };

    let announcement = NewAnnouncement {
        title,
        content,
        announcement_type: data.announcement_type,
        created_by: user.id,
    };

    // 公告、接收记录与通知同一事务写入
    match storage.create_announcement(announcement, &recipients).await {
        Ok(announcement) => {
            tracing::info!(
                "Announcement {} ({}) delivered to {} teachers",
                announcement.id,
                announcement.announcement_type,
                recipients.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                announcement,
                "Announcement created successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Announcement creation failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEACHERS: &[i64] = &[3, 1, 2];

    #[test]
    fn test_general_goes_to_every_teacher() {
        let ids = resolve_recipients(AnnouncementType::General, None, TEACHERS).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        // 提交的列表被忽略
        let ids = resolve_recipients(AnnouncementType::General, Some(&[2]), TEACHERS).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_targeted_only_requested() {
        let ids =
            resolve_recipients(AnnouncementType::Targeted, Some(&[2, 3, 2]), TEACHERS).unwrap();
        assert_eq!(ids, vec![2, 3]);

        let ids =
            resolve_recipients(AnnouncementType::DrawAttention, Some(&[1]), TEACHERS).unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_targeted_requires_recipients() {
        assert!(resolve_recipients(AnnouncementType::Targeted, None, TEACHERS).is_err());
        assert!(resolve_recipients(AnnouncementType::Targeted, Some(&[]), TEACHERS).is_err());
        assert!(resolve_recipients(AnnouncementType::DrawAttention, None, TEACHERS).is_err());
    }

    #[test]
    fn test_targeted_rejects_non_teachers() {
        let err =
            resolve_recipients(AnnouncementType::Targeted, Some(&[1, 99]), TEACHERS).unwrap_err();
        assert!(err.contains("99"));
    }

    #[test]
    fn test_general_without_teachers() {
        let ids = resolve_recipients(AnnouncementType::General, None, &[]).unwrap();
        assert!(ids.is_empty());
    }
}
