/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::models::question::FormSchema;
use crate::models::result::ResultSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 日志级别由 `RUST_LOG` 控制，未设置时为 `info`。
/// 重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 表单自动提交");
    info!("⚙️ 运行模式: {:?}", config.run_mode);
    if !config.form_url.is_empty() {
        info!("🔗 表单地址: {}", config.form_url);
    }
    info!(
        "📊 提交次数: {} | 间隔: {} 秒",
        config.runs, config.break_seconds
    );
    if let Some(seed) = config.random_seed {
        info!("🎲 随机种子: {}", seed);
    }
    info!("{}", "=".repeat(60));
}

/// 记录表单结构摘要
pub fn log_schema_summary(schema: &FormSchema) {
    info!("\n{}", "─".repeat(60));
    info!("📋 表单ID: {}", schema.form_id);
    info!("📮 提交地址: {}", schema.submit_url);
    for question in schema.questions() {
        info!(
            "  [{}] {} ({}) - {} 个选项",
            question.kind.name(),
            truncate_text(&question.display_text, 30),
            question.identifier,
            question.options.len()
        );
    }
    info!("共 {} 个问题", schema.question_count());
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `results`: 整批提交结果
/// - `result_file`: 结果文件路径，空字符串表示未写文件
pub fn print_final_stats(results: &ResultSet, result_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部提交完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", results.successful, results.total);
    info!("❌ 失败: {}", results.failed);
    info!("{}", "=".repeat(60));
    if !result_file.is_empty() {
        info!("\n结果已保存至: {}", result_file);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("你好世界", 2), "你好...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
