use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表单解析错误
    #[error("表单解析错误: {0}")]
    Extract(#[from] ExtractError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// HTTP 客户端初始化失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// 表单解析错误
///
/// 任何一种都会终止整个解析过程，不返回半成品 schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// 获取表单页面时未得到 200 响应
    #[error("获取表单页面失败，状态码: {status}")]
    Fetch { status: u16 },
    /// 最终地址中找不到表单 ID
    #[error("无法从地址中解析表单ID: {url}")]
    IdentifierNotFound { url: String },
    /// 其他解析失败
    #[error("表单解析失败: {message}")]
    Extraction { message: String },
}

/// 单次提交错误
///
/// 只影响当前这一次提交，批次会继续执行
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// 网络请求失败（没有拿到响应）
    #[error("提交请求失败: {message}")]
    Transport { message: String },
    /// 请求数据编码失败
    #[error("提交数据编码失败: {message}")]
    Encoding { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// schema 中有重复的问题ID
    #[error("schema 文件中问题ID重复 ({path}): {identifier}")]
    DuplicateQuestion { path: String, identifier: String },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 缺少必要的配置项
    #[error("缺少配置项: {var_name}")]
    MissingValue { var_name: String },
    /// 配置值不合法
    #[error("配置项 {var_name} 不合法: {reason}")]
    InvalidValue { var_name: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl ExtractError {
    /// 创建通用解析错误
    pub fn extraction(message: impl Into<String>) -> Self {
        ExtractError::Extraction {
            message: message.into(),
        }
    }
}

impl SubmissionError {
    /// 创建网络错误
    pub fn transport(message: impl Into<String>) -> Self {
        SubmissionError::Transport {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        // 构建请求体失败说明答案无法编码
        if err.is_builder() {
            SubmissionError::Encoding {
                message: err.to_string(),
            }
        } else {
            SubmissionError::Transport {
                message: err.to_string(),
            }
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_converts_into_app_error() {
        let err: AppError = ExtractError::Fetch { status: 404 }.into();
        assert!(matches!(err, AppError::Extract(ExtractError::Fetch { status: 404 })));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_submission_error_message_is_preserved() {
        let err = SubmissionError::transport("connection refused");
        assert_eq!(err.to_string(), "提交请求失败: connection refused");
    }
}
