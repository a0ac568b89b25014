/// 可上传的文件种类（教案、课表、通知附件）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Pdf,
    /// 旧版 Office（OLE 复合文档）
    LegacyOffice,
    /// 新版 Office（基于 ZIP 的 OOXML）
    OpenXml,
    Zip,
    Csv,
    Text,
}

impl FileKind {
    /// 扩展名含点号，大小写不敏感
    pub fn from_extension(extension: &str) -> Option<Self> {
        let kind = match extension.to_ascii_lowercase().as_str() {
            ".png" => FileKind::Png,
            ".jpg" | ".jpeg" => FileKind::Jpeg,
            ".gif" => FileKind::Gif,
            ".webp" => FileKind::Webp,
            ".pdf" => FileKind::Pdf,
            ".doc" | ".xls" | ".ppt" => FileKind::LegacyOffice,
            ".docx" | ".xlsx" | ".pptx" => FileKind::OpenXml,
            ".zip" => FileKind::Zip,
            ".csv" => FileKind::Csv,
            ".txt" | ".md" => FileKind::Text,
            _ => return None,
        };
        Some(kind)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileKind::Png => "image/png",
            FileKind::Jpeg => "image/jpeg",
            FileKind::Gif => "image/gif",
            FileKind::Webp => "image/webp",
            FileKind::Pdf => "application/pdf",
            FileKind::LegacyOffice | FileKind::OpenXml => "application/octet-stream",
            FileKind::Zip => "application/zip",
            FileKind::Csv => "text/csv; charset=utf-8",
            FileKind::Text => "text/plain; charset=utf-8",
        }
    }

    /// 检查文件头是否符合该种类
    pub fn matches(&self, head: &[u8]) -> bool {
        const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
        const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

        if head.is_empty() {
            return false;
        }
        match self {
            FileKind::Png => head.starts_with(b"\x89PNG\r\n\x1a\n"),
            FileKind::Jpeg => head.starts_with(&[0xFF, 0xD8, 0xFF]),
            FileKind::Gif => head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a"),
            FileKind::Webp => head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP",
            FileKind::Pdf => head.starts_with(b"%PDF"),
            FileKind::LegacyOffice => head.starts_with(OLE),
            FileKind::OpenXml | FileKind::Zip => head.starts_with(ZIP),
            // 文本类不能含 NUL
            FileKind::Csv | FileKind::Text => !head.contains(&0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
        FileKind::from_extension(extension).is_some_and(|kind| kind.matches(data))
    }

    #[test]
    fn test_image_headers() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
    }

    #[test]
    fn test_office_documents() {
        let ooxml = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&ooxml, ".xlsx"));
        assert!(validate_magic_bytes(&ooxml, ".docx"));
        assert!(!validate_magic_bytes(&ooxml, ".doc"));
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
    }

    #[test]
    fn test_text_rejects_binary() {
        assert!(validate_magic_bytes(b"day,period\nMON,1\n", ".csv"));
        assert!(!validate_magic_bytes(&[0x41, 0x00, 0x42], ".txt"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
        assert_eq!(FileKind::from_extension(".exe"), None);
        assert_eq!(
            FileKind::from_extension(".Csv").map(|k| k.content_type()),
            Some("text/csv; charset=utf-8")
        );
    }
}
