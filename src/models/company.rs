//! 公司记录：整个运行的工作单元
//!
//! 每张列表卡片创建一个 `CompanyRecord`，之后由
//! 唯一一次详情页访问原地补全。

use serde::{Deserialize, Serialize};

/// 创始人姓名 / 链接合并到一个单元格时的分隔符
pub const JOIN_SEPARATOR: &str = ", ";

/// 列表卡片上的公司信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    pub batch: String,
    pub description: String,
    /// 详情页绝对 url，卡片没有链接时为空
    pub url: String,
}

/// 详情页上的一个创始人区块
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Founder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl Founder {
    /// 空值视为缺失
    pub fn new(name: Option<String>, linkedin_url: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            linkedin_url: linkedin_url.filter(|l| !l.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.linkedin_url.is_none()
    }
}

/// 记录所处的生命周期阶段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    Succeeded { founders: usize },
    /// `reason` 仅用于诊断，不写入 csv
    Failed { reason: String },
}

impl EnrichmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EnrichmentStatus::Pending)
    }
}

/// 列表摘要加创始人补全结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(flatten)]
    pub summary: CompanySummary,
    pub founders: Vec<Founder>,
    pub status: EnrichmentStatus,
}

impl CompanyRecord {
    pub fn new(summary: CompanySummary) -> Self {
        Self {
            summary,
            founders: Vec::new(),
            status: EnrichmentStatus::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn url(&self) -> &str {
        &self.summary.url
    }

    pub fn mark_succeeded(&mut self, founders: Vec<Founder>) {
        self.status = EnrichmentStatus::Succeeded {
            founders: founders.len(),
        };
        self.founders = founders;
    }

    /// 丢弃部分结果，输出单元格保持为空
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.founders.clear();
        self.status = EnrichmentStatus::Failed {
            reason: reason.into(),
        };
    }

    /// 按页面顺序的创始人姓名，跳过没有姓名的区块
    pub fn founder_names(&self) -> Vec<&str> {
        self.founders
            .iter()
            .filter_map(|f| f.name.as_deref())
            .collect()
    }

    /// 按页面顺序的主页链接，跳过没有链接的区块
    pub fn founder_links(&self) -> Vec<&str> {
        self.founders
            .iter()
            .filter_map(|f| f.linkedin_url.as_deref())
            .collect()
    }

    pub fn joined_founder_names(&self) -> String {
        self.founder_names().join(JOIN_SEPARATOR)
    }

    pub fn joined_founder_links(&self) -> String {
        self.founder_links().join(JOIN_SEPARATOR)
    }
}
