//! Offline provider backed by the heuristic analyzer.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AnalysisProvider, AnalysisRequest, ProviderError, ProviderReply};
use crate::analysis::heuristics::mock_analyze;

/// Reviews resumes locally. Selected as `mock`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

#[async_trait]
impl AnalysisProvider for HeuristicProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_hosted(&self) -> bool {
        false
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<ProviderReply, ProviderError> {
        Ok(ProviderReply {
            text: mock_analyze(&request.text, request.role.as_deref(), today),
            provider: self.name(),
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sections::parse;

    #[tokio::test]
    async fn test_heuristic_reply_follows_heading_convention() {
        let request = AnalysisRequest {
            text: "Python, SQL ve Tableau ile raporlama yaptım. İngilizce C1. 2019 - 2021 arası analist."
                .to_string(),
            role: Some("Veri Analisti".to_string()),
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let reply = HeuristicProvider.generate(&request, today).await.unwrap();
        assert_eq!(reply.provider, "mock");
        assert!(reply.model.is_none());
        let parsed = parse(&reply.text);
        assert!(parsed.summary.starts_with("Hedef rol: Veri Analisti."));
        assert!(parsed.strengths.len() >= 6);
    }
}
