use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

// 问询状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquestStatus {
    Pending,   // 待教师回复
    Responded, // 教师已回复
    Completed, // 管理员已结案
}

impl std::fmt::Display for InquestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InquestStatus::Pending => write!(f, "PENDING"),
            InquestStatus::Responded => write!(f, "RESPONDED"),
            InquestStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for InquestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InquestStatus::Pending),
            "RESPONDED" => Ok(InquestStatus::Responded),
            "COMPLETED" => Ok(InquestStatus::Completed),
            _ => Err(format!("Invalid inquest status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Inquest {
    pub id: i64,
    pub teacher_id: i64,
    pub created_by: i64,
    pub subject: String,
    pub description: String,
    pub lesson_id: Option<i64>,
    pub status: InquestStatus,
    pub response: Option<String>,
    pub responded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub decision: Option<String>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 一次合法的状态迁移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InquestTransition {
    Respond { response: String },
    Complete { decision: String },
}

impl InquestTransition {
    pub fn from_status(&self) -> InquestStatus {
        match self {
            InquestTransition::Respond { .. } => InquestStatus::Pending,
            InquestTransition::Complete { .. } => InquestStatus::Responded,
        }
    }

    pub fn to_status(&self) -> InquestStatus {
        match self {
            InquestTransition::Respond { .. } => InquestStatus::Responded,
            InquestTransition::Complete { .. } => InquestStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// 操作者无权执行该迁移
    Forbidden(String),
    /// 迁移本身不合法或缺少内容
    Invalid(String),
}

/// 问询状态机：PENDING → RESPONDED（所属教师），RESPONDED → COMPLETED（管理员）
pub fn check_transition(
    current: InquestStatus,
    target: InquestStatus,
    actor_role: &UserRole,
    actor_is_owner: bool,
    response: Option<&str>,
    decision: Option<&str>,
) -> Result<InquestTransition, TransitionError> {
    let non_empty = |text: Option<&str>| {
        text.map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };

    match (current, target) {
        (InquestStatus::Pending, InquestStatus::Responded) => {
            if *actor_role != UserRole::Teacher || !actor_is_owner {
                return Err(TransitionError::Forbidden(
                    "Only the inquested teacher can respond".to_string(),
                ));
            }
            let response = non_empty(response)
                .ok_or_else(|| TransitionError::Invalid("response is required".to_string()))?;
            Ok(InquestTransition::Respond { response })
        }
        (InquestStatus::Responded, InquestStatus::Completed) => {
            if *actor_role != UserRole::Admin {
                return Err(TransitionError::Forbidden(
                    "Only an administrator can complete an inquest".to_string(),
                ));
            }
            let decision = non_empty(decision)
                .ok_or_else(|| TransitionError::Invalid("decision is required".to_string()))?;
            Ok(InquestTransition::Complete { decision })
        }
        (from, to) => Err(TransitionError::Invalid(format!(
            "Cannot change inquest status from {from} to {to}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_teacher_responds() {
        let result = check_transition(
            InquestStatus::Pending,
            InquestStatus::Responded,
            &UserRole::Teacher,
            true,
            Some("  explanation "),
            None,
        );
        assert_eq!(
            result,
            Ok(InquestTransition::Respond {
                response: "explanation".to_string()
            })
        );
    }

    #[test]
    fn test_respond_requires_owner() {
        let other = check_transition(
            InquestStatus::Pending,
            InquestStatus::Responded,
            &UserRole::Teacher,
            false,
            Some("x"),
            None,
        );
        assert!(matches!(other, Err(TransitionError::Forbidden(_))));

        let admin = check_transition(
            InquestStatus::Pending,
            InquestStatus::Responded,
            &UserRole::Admin,
            false,
            Some("x"),
            None,
        );
        assert!(matches!(admin, Err(TransitionError::Forbidden(_))));
    }

    #[test]
    fn test_respond_requires_text() {
        let result = check_transition(
            InquestStatus::Pending,
            InquestStatus::Responded,
            &UserRole::Teacher,
            true,
            Some("   "),
            None,
        );
        assert!(matches!(result, Err(TransitionError::Invalid(_))));
    }

    #[test]
    fn test_admin_completes() {
        let result = check_transition(
            InquestStatus::Responded,
            InquestStatus::Completed,
            &UserRole::Admin,
            false,
            None,
            Some("warning issued"),
        );
        assert_eq!(
            result.map(|t| t.to_status()),
            Ok(InquestStatus::Completed)
        );

        let teacher = check_transition(
            InquestStatus::Responded,
            InquestStatus::Completed,
            &UserRole::Teacher,
            true,
            None,
            Some("done"),
        );
        assert!(matches!(teacher, Err(TransitionError::Forbidden(_))));
    }

    #[test]
    fn test_invalid_transitions() {
        for (from, to) in [
            (InquestStatus::Pending, InquestStatus::Completed),
            (InquestStatus::Pending, InquestStatus::Pending),
            (InquestStatus::Responded, InquestStatus::Pending),
            (InquestStatus::Completed, InquestStatus::Responded),
            (InquestStatus::Completed, InquestStatus::Completed),
        ] {
            let result = check_transition(from, to, &UserRole::Admin, true, Some("r"), Some("d"));
            assert!(
                matches!(result, Err(TransitionError::Invalid(_))),
                "{from} -> {to} should be rejected"
            );
        }
    }
}
