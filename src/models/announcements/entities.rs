use serde::{Deserialize, Serialize};

// 公告类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnouncementType {
    General,       // 全体教师
    Targeted,      // 指定教师
    DrawAttention, // 提醒，按指定教师投递
}

impl AnnouncementType {
    /// 是否需要调用方给出接收人
    pub fn is_targeted(&self) -> bool {
        !matches!(self, AnnouncementType::General)
    }
}

impl std::fmt::Display for AnnouncementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnouncementType::General => write!(f, "GENERAL"),
            AnnouncementType::Targeted => write!(f, "TARGETED"),
            AnnouncementType::DrawAttention => write!(f, "DRAW_ATTENTION"),
        }
    }
}

impl std::str::FromStr for AnnouncementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GENERAL" => Ok(AnnouncementType::General),
            "TARGETED" => Ok(AnnouncementType::Targeted),
            "DRAW_ATTENTION" => Ok(AnnouncementType::DrawAttention),
            _ => Err(format!("Invalid announcement type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 接收人行
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementRecipient {
    pub id: i64,
    pub announcement_id: i64,
    pub user_id: i64,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 列表/详情视图：管理员看到接收与已读统计，教师看到自己的已读状态
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: Announcement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_serde() {
        let kind: AnnouncementType = serde_json::from_str("\"DRAW_ATTENTION\"").unwrap();
        assert_eq!(kind, AnnouncementType::DrawAttention);
        assert!(kind.is_targeted());
        assert!(!AnnouncementType::General.is_targeted());
        assert_eq!("targeted".parse::<AnnouncementType>().unwrap(), AnnouncementType::Targeted);
        assert_eq!(AnnouncementType::General.to_string(), "GENERAL");
    }
}
