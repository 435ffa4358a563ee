/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的组卷计划数量
    pub max_concurrent_plans: usize,
    /// 组卷计划（TOML）存放目录
    pub plan_folder: String,
    /// 本地题库 JSON 文件，优先于远程题库
    pub question_bank_path: Option<String>,
    /// 远程题库 API 地址
    pub question_bank_url: Option<String>,
    /// 生成的试卷存放目录
    pub output_folder: String,
    /// 题量不足报告文件
    pub shortfall_report: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 抽题随机种子，设置后结果可复现
    pub sampling_seed: Option<u64>,
    /// 处理完成后是否把计划文件重命名为 *.done
    pub archive_processed_plans: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_plans: 4,
            plan_folder: "plans".to_string(),
            question_bank_path: Some("question_bank.json".to_string()),
            question_bank_url: None,
            output_folder: "generated_tests".to_string(),
            shortfall_report: "shortfall.txt".to_string(),
            output_log_file: "output.txt".to_string(),
            sampling_seed: None,
            archive_processed_plans: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_plans: std::env::var("MAX_CONCURRENT_PLANS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(default.max_concurrent_plans),
            plan_folder: std::env::var("PLAN_FOLDER").unwrap_or(default.plan_folder),
            question_bank_path: std::env::var("QUESTION_BANK_PATH").ok().or(default.question_bank_path),
            question_bank_url: std::env::var("QUESTION_BANK_URL").ok().or(default.question_bank_url),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            shortfall_report: std::env::var("SHORTFALL_REPORT").unwrap_or(default.shortfall_report),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            sampling_seed: std::env::var("SAMPLING_SEED").ok().and_then(|v| v.parse().ok()).or(default.sampling_seed),
            archive_processed_plans: std::env::var("ARCHIVE_PROCESSED_PLANS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.archive_processed_plans),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
