//! 创建请求的输入校验
//!
//! url 和 slug 的格式规则，以及自引用域名检查。

use url::Url;

use crate::errors::LinkforgeError;

/// slug 长度范围（UTF-16 code unit 计数）
pub const SLUG_MIN_LEN: usize = 2;
pub const SLUG_MAX_LEN: usize = 10;

/// 输入校验错误
///
/// `Display` 文本就是返回给客户端的 message。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingUrl,
    IllegalUrlFormat,
    IllegalSlug,
    SameDomain,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingUrl => "Missing required parameter: url.",
            Self::IllegalUrlFormat => "Illegal format: url.",
            Self::IllegalSlug => {
                "Illegal length: slug, (>= 2 && <= 10), or not ending with a file extension."
            }
            Self::SameDomain => "You cannot shorten a link to the same domain.",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for LinkforgeError {
    fn from(err: ValidationError) -> Self {
        LinkforgeError::validation(err.message())
    }
}

/// `.` 在正则里不匹配的行终止符
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// 校验 url 形如 `^https?://.{3,}`
///
/// 协议区分大小写，`://` 之后紧跟至少 3 个非换行字符。
/// 这里只看形状，完整解析留给自引用检查。
pub fn validate_url_format(url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(ValidationError::IllegalUrlFormat)?;

    let leading = rest.chars().take_while(|c| !is_line_terminator(*c)).take(3);
    if leading.count() < 3 {
        return Err(ValidationError::IllegalUrlFormat);
    }

    Ok(())
}

/// slug 是否像文件名：`.+\.[a-zA-Z]+$`
///
/// 只需看最后一个点：字母后缀不可能再包含点。
pub fn looks_like_file_name(slug: &str) -> bool {
    let Some(dot) = slug.rfind('.') else {
        return false;
    };

    let ext = &slug[dot + 1..];
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    slug[..dot]
        .chars()
        .next_back()
        .is_some_and(|c| !is_line_terminator(c))
}

/// 校验自定义 slug：长度 [2, 10] 且不以文件后缀结尾
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let len = slug.encode_utf16().count();
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) || looks_like_file_name(slug) {
        return Err(ValidationError::IllegalSlug);
    }
    Ok(())
}

/// 目标 url 的 hostname 是否就是本服务
///
/// 两边都经过 URL 解析器规范化（小写、IDNA），端口不参与比较。
pub fn is_same_domain(url: &str, service_hostname: &str) -> Result<bool, url::ParseError> {
    let parsed = Url::parse(url)?;
    Ok(parsed
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(service_hostname)))
}
