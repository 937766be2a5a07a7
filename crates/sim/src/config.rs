//! 模拟参数

use core::fmt;
use std::time::Duration;

/// 默认碗数
pub const DEFAULT_BOWLS: usize = 5;
/// 默认猫数
pub const DEFAULT_CATS: usize = 2;
/// 默认老鼠数
pub const DEFAULT_MICE: usize = 3;
/// 每个个体默认进食轮数
pub const DEFAULT_ROUNDS: usize = 4;
/// 默认进食时长
pub const DEFAULT_EAT_TIME: Duration = Duration::from_millis(2);
/// 默认两次进食之间的休息时长
pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_millis(1);

/// 命令行用法
pub const USAGE: &str = "usage: catmouse-sim [bowls [cats [mice [rounds]]]]";

/// 一次模拟的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// 碗数
    pub bowls: usize,
    /// 猫数
    pub cats: usize,
    /// 老鼠数
    pub mice: usize,
    /// 每个个体的进食轮数
    pub rounds: usize,
    /// 猫每次进食时长
    pub cat_eat: Duration,
    /// 猫两次进食之间的休息时长
    pub cat_sleep: Duration,
    /// 老鼠每次进食时长
    pub mouse_eat: Duration,
    /// 老鼠两次进食之间的休息时长
    pub mouse_sleep: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bowls: DEFAULT_BOWLS,
            cats: DEFAULT_CATS,
            mice: DEFAULT_MICE,
            rounds: DEFAULT_ROUNDS,
            cat_eat: DEFAULT_EAT_TIME,
            cat_sleep: DEFAULT_SLEEP_TIME,
            mouse_eat: DEFAULT_EAT_TIME,
            mouse_sleep: DEFAULT_SLEEP_TIME,
        }
    }
}

impl SimConfig {
    /// 从位置参数 `bowls cats mice rounds` 解析，缺省的参数取默认值
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        const NAMES: [&str; 4] = ["bowls", "cats", "mice", "rounds"];

        let mut config = Self::default();
        for (position, arg) in args.into_iter().enumerate() {
            let name = *NAMES.get(position).ok_or(ConfigError::TooManyArguments)?;
            let arg = arg.as_ref();
            let value = arg.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                name,
                value: arg.to_string(),
            })?;
            match position {
                0 => config.bowls = value,
                1 => config.cats = value,
                2 => config.mice = value,
                _ => config.rounds = value,
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// 检查参数是否能构成一次模拟
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bowls == 0 {
            return Err(ConfigError::NoBowls);
        }
        if self.cats == 0 && self.mice == 0 {
            return Err(ConfigError::NoCreatures);
        }
        Ok(())
    }

    /// 个体总数
    pub fn creatures(&self) -> usize {
        self.cats + self.mice
    }
}

/// 参数错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 参数不是非负整数
    InvalidNumber {
        /// 参数名
        name: &'static str,
        /// 原始文本
        value: String,
    },
    /// 位置参数超过四个
    TooManyArguments,
    /// 碗数为 0
    NoBowls,
    /// 猫和老鼠都为 0
    NoCreatures,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", name, value)
            }
            ConfigError::TooManyArguments => f.write_str("too many arguments"),
            ConfigError::NoBowls => f.write_str("at least one bowl is required"),
            ConfigError::NoCreatures => f.write_str("at least one cat or mouse is required"),
        }
    }
}

impl std::error::Error for ConfigError {}
