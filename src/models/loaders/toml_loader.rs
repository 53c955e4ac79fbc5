use crate::error::{AppResult, FileError};
use crate::models::question::FormSchema;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载表单结构（权重可能已被人工修改）
pub async fn load_schema_file(toml_file_path: &Path) -> AppResult<FormSchema> {
    let path = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.clone(),
            source,
        })?;

    let schema = parse_schema_toml(&content).map_err(|source| FileError::TomlParseFailed {
        path: path.clone(),
        source,
    })?;

    if let Some(identifier) = schema.duplicate_identifier() {
        return Err(FileError::DuplicateQuestion {
            path,
            identifier: identifier.to_string(),
        }
        .into());
    }

    tracing::info!("成功加载 {} 个问题: {}", schema.question_count(), path);

    Ok(schema)
}

/// 把表单结构写入 TOML 文件，方便人工编辑权重
pub async fn save_schema_file(toml_file_path: &Path, schema: &FormSchema) -> AppResult<()> {
    let content = schema_to_toml(schema)?;
    fs::write(toml_file_path, content)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: toml_file_path.display().to_string(),
            source,
        })?;
    Ok(())
}

pub fn parse_schema_toml(content: &str) -> Result<FormSchema, toml::de::Error> {
    toml::from_str(content)
}

pub fn schema_to_toml(schema: &FormSchema) -> Result<String, FileError> {
    Ok(toml::to_string_pretty(schema)?)
}
