/// 文件签名：(偏移, 字节)
type Signature = (usize, &'static [u8]);

const PNG: &[Signature] = &[(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])];
const JPEG: &[Signature] = &[(0, &[0xFF, 0xD8, 0xFF])];
const GIF: &[Signature] = &[(0, b"GIF87a"), (0, b"GIF89a")];
const WEBP: &[Signature] = &[(8, b"WEBP")];
const PDF: &[Signature] = &[(0, b"%PDF")];
// OLE 复合文档（旧版 Office）
const OLE: &[Signature] = &[(0, &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])];
// ZIP（OOXML 同为 ZIP 容器；空压缩包以 PK\x05\x06 开头）
const ZIP: &[Signature] = &[(0, &[0x50, 0x4B, 0x03, 0x04]), (0, &[0x50, 0x4B, 0x05, 0x06])];
const GZIP: &[Signature] = &[(0, &[0x1F, 0x8B])];
const SEVEN_ZIP: &[Signature] = &[(0, &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C])];
const MP4: &[Signature] = &[(4, b"ftyp")];

/// 扩展名对应的签名；None 表示文本类文件，不检查魔术字节
fn signatures_for(extension: &str) -> Option<Option<&'static [Signature]>> {
    let sigs = match extension {
        ".png" => Some(PNG),
        ".jpg" | ".jpeg" => Some(JPEG),
        ".gif" => Some(GIF),
        ".webp" => Some(WEBP),
        ".pdf" => Some(PDF),
        ".doc" | ".xls" | ".ppt" => Some(OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => Some(ZIP),
        ".gz" => Some(GZIP),
        ".7z" => Some(SEVEN_ZIP),
        ".mp4" => Some(MP4),
        ".txt" | ".md" | ".csv" | ".json" => None,
        _ => return None,
    };
    Some(sigs)
}

/// 校验文件头与扩展名是否匹配
///
/// `data` 为文件开头的若干字节，`extension` 含点号（大小写不敏感）。
/// 未知扩展名和空数据一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }
    match signatures_for(&extension.to_ascii_lowercase()) {
        None => false,
        Some(None) => true,
        Some(Some(sigs)) => sigs.iter().any(|(offset, magic)| {
            data.len() >= offset + magic.len() && &data[*offset..offset + magic.len()] == *magic
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_offset_signature() {
        let webp = b"RIFF\x10\x00\x00\x00WEBPVP8 ";
        assert!(validate_magic_bytes(webp, ".webp"));
        assert!(!validate_magic_bytes(b"RIFF", ".webp"));
    }

    #[test]
    fn test_office_formats() {
        let docx = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&docx, ".docx"));
        assert!(!validate_magic_bytes(&docx, ".doc"));
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
    }

    #[test]
    fn test_text_files_skip_check() {
        assert!(validate_magic_bytes(b"# Notes", ".md"));
        assert!(validate_magic_bytes(b"plain", ".txt"));
    }

    #[test]
    fn test_empty_and_unknown_rejected() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }
}
