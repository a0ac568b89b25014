use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct File {
    // 下载令牌（唯一标识）
    pub download_token: String,
    // 上传时的原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing)]
    pub stored_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    // MIME 类型
    pub file_type: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
