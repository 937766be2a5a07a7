//! 两个互斥的物种

use core::fmt;

/// 参与竞争的物种
///
/// 任意时刻只允许其中一个物种有个体在进食。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// 猫
    Cat,
    /// 老鼠
    Mouse,
}

impl Species {
    /// 全部物种
    pub const ALL: [Species; 2] = [Species::Cat, Species::Mouse];

    /// 另一个物种
    pub const fn other(self) -> Self {
        match self {
            Species::Cat => Species::Mouse,
            Species::Mouse => Species::Cat,
        }
    }

    /// 小写名称，用于日志
    pub const fn name(self) -> &'static str {
        match self {
            Species::Cat => "cat",
            Species::Mouse => "mouse",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        for species in Species::ALL {
            assert_ne!(species, species.other());
            assert_eq!(species, species.other().other());
        }
    }
}
