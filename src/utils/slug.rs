use std::path::Path;

/// 文章文件扩展名
pub const POST_EXTENSION: &str = "md";

/// 从文件名推导 slug（去掉 `.md` 扩展名），非文章文件返回 `None`
///
/// 和 [`is_safe_slug`] 使用同一规则，列表里出现的 slug 都能直接访问。
pub fn slug_from_path(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != POST_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_safe_slug(stem).then(|| stem.to_string())
}

/// 验证外部传入的 slug 能否安全地拼接成 `<posts_dir>/<slug>.md`
///
/// 文件名可能含中文或空格，这里只拒绝能跳出文章目录的写法。
pub fn is_safe_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 255 {
        return false;
    }

    // 隐藏文件、`.`、`..`
    if slug.starts_with('.') {
        return false;
    }

    !slug.chars().any(|c| matches!(c, '/' | '\\' | '\0' | ':'))
}
