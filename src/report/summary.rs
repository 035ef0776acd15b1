use crate::workload::BatchResult;

/// 单个批次结果的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 截止时间到达时仍未完成的请求数
    pub incomplete: usize,
}

impl BatchSummary {
    pub fn from_result(result: &BatchResult) -> Self {
        let incomplete = result
            .responses
            .iter()
            .filter(|r| !r.is_complete())
            .count();
        let succeeded = result.responses.iter().filter(|r| r.is_success()).count();
        let total = result.responses.len();

        Self {
            total,
            succeeded,
            failed: total - succeeded - incomplete,
            incomplete,
        }
    }
}
