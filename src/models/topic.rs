use std::str::FromStr;

/// 认证考试方向
///
/// 会话内一旦开始出题就不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum ExamTopic {
    /// Google 机器学习工程师
    #[default]
    GoogleProfessionalMlEngineer,
    /// AWS 解决方案架构师（助理级）
    AwsSolutionArchitectAssociate,
    /// Azure 数据基础
    AzureDataFundamentals,
}

impl ExamTopic {
    /// 菜单中的全部考试方向（按显示顺序）
    pub const ALL: [ExamTopic; 3] = [
        ExamTopic::GoogleProfessionalMlEngineer,
        ExamTopic::AwsSolutionArchitectAssociate,
        ExamTopic::AzureDataFundamentals,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ExamTopic::GoogleProfessionalMlEngineer => {
                "Google Professional Machine Learning Engineer"
            }
            ExamTopic::AwsSolutionArchitectAssociate => "AWS Solution Architect Associate",
            ExamTopic::AzureDataFundamentals => "Microsoft Azure Data Fundamentals",
        }
    }

    /// 从菜单序号解析（从1开始）
    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl FromStr for ExamTopic {
    type Err = String;

    /// 支持完整名称（忽略大小写）或菜单序号
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| format!("unknown exam topic: {}", s));
        }

        Self::ALL
            .into_iter()
            .find(|topic| topic.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown exam topic: {}", s))
    }
}

impl std::fmt::Display for ExamTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
