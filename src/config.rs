use crate::error::ConfigError;

/// 运行模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// 只解析表单并写出 schema 文件
    Parse,
    /// 读取（可能已人工修改权重的）schema 文件并批量提交
    Submit,
    /// 解析后直接使用默认权重提交
    All,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "parse" => Some(RunMode::Parse),
            "submit" => Some(RunMode::Submit),
            "all" => Some(RunMode::All),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 运行模式
    pub run_mode: RunMode,
    /// 表单地址
    pub form_url: String,
    /// schema 文件路径（parse 模式写出，submit 模式读入）
    pub schema_file: String,
    /// 提交结果 JSON 输出路径，空字符串表示不写文件
    pub result_file: String,
    /// 提交次数
    pub runs: usize,
    /// 两次提交之间的间隔（秒）
    pub break_seconds: f64,
    /// 随机种子，设置后同样的输入会得到同样的提交计划
    pub random_seed: Option<u64>,
    /// 浏览器标识
    pub user_agent: String,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    /// 最多跟随的重定向次数
    pub max_redirects: usize,
    /// 提交地址模板，`{form_id}` 会被替换为表单ID
    pub submit_url_template: String,
    /// 响应中出现即视为提交成功的标记
    pub success_markers: Vec<String>,
    /// 响应中出现即视为提交失败的标记
    pub failure_markers: Vec<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: RunMode::All,
            form_url: String::new(),
            schema_file: "form_schema.toml".to_string(),
            result_file: String::new(),
            runs: 1,
            break_seconds: 1.0,
            random_seed: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 30,
            max_redirects: 10,
            submit_url_template: "https://docs.google.com/forms/d/e/{form_id}/formResponse"
                .to_string(),
            success_markers: vec![
                "Your response has been recorded".to_string(),
                "freebirdFormviewerViewResponseConfirmationMessage".to_string(),
                "您的回复已记录".to_string(),
                "已记录您的回复".to_string(),
            ],
            failure_markers: vec![
                "Something went wrong".to_string(),
                "Try again".to_string(),
                "出了点问题".to_string(),
                "请重试".to_string(),
            ],
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        let config = Self {
            run_mode: match std::env::var("RUN_MODE") {
                Ok(v) => RunMode::parse(&v).ok_or_else(|| ConfigError::EnvVarParseFailed {
                    var_name: "RUN_MODE".to_string(),
                    value: v.clone(),
                    expected_type: "parse | submit | all".to_string(),
                })?,
                Err(_) => default.run_mode,
            },
            form_url: std::env::var("FORM_URL").unwrap_or(default.form_url),
            schema_file: std::env::var("SCHEMA_FILE").unwrap_or(default.schema_file),
            result_file: std::env::var("RESULT_FILE").unwrap_or(default.result_file),
            runs: parse_env("RUNS", "usize")?.unwrap_or(default.runs),
            break_seconds: parse_env("BREAK_SECONDS", "f64")?.unwrap_or(default.break_seconds),
            random_seed: parse_env("RANDOM_SEED", "u64")?.or(default.random_seed),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            max_redirects: parse_env("MAX_REDIRECTS", "usize")?.unwrap_or(default.max_redirects),
            submit_url_template: std::env::var("SUBMIT_URL_TEMPLATE")
                .unwrap_or(default.submit_url_template),
            success_markers: std::env::var("SUCCESS_MARKERS")
                .map(|v| split_markers(&v))
                .unwrap_or(default.success_markers),
            failure_markers: std::env::var("FAILURE_MARKERS")
                .map(|v| split_markers(&v))
                .unwrap_or(default.failure_markers),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::InvalidValue {
                var_name: "RUNS".to_string(),
                reason: "提交次数至少为 1".to_string(),
            });
        }
        if !self.break_seconds.is_finite() || self.break_seconds < 0.0 {
            return Err(ConfigError::InvalidValue {
                var_name: "BREAK_SECONDS".to_string(),
                reason: format!("间隔必须是非负数，当前为 {}", self.break_seconds),
            });
        }
        if !self.submit_url_template.contains("{form_id}") {
            return Err(ConfigError::InvalidValue {
                var_name: "SUBMIT_URL_TEMPLATE".to_string(),
                reason: "模板中缺少 {form_id} 占位符".to_string(),
            });
        }
        Ok(())
    }

    /// 需要表单地址的模式下取出地址
    pub fn require_form_url(&self) -> Result<&str, ConfigError> {
        if self.form_url.trim().is_empty() {
            Err(ConfigError::MissingValue {
                var_name: "FORM_URL".to_string(),
            })
        } else {
            Ok(self.form_url.trim())
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// 逗号分隔的标记列表
fn split_markers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
