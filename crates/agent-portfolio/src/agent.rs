//! Portfolio agent: one utterance in, one spoken answer out

use agent_core::{Agent, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::aggregate::CountBy;
use crate::assistant::{InfoSection, PortfolioAssistant, ThesisKind};
use crate::dates::FixedClock;
use crate::fields::NumericField;
use crate::news::NewsQuery;
use crate::ranking::RankRequest;
use crate::router::{QueryIntent, RoutingResult, SmartRouter};

const UNIDENTIFIED_COMPANY: &str =
    "I'm sorry, I couldn't identify which company you're asking about.";

/// Agent answering free-text portfolio questions
///
/// The utterance is classified by [`SmartRouter`] and answered by the
/// matching [`PortfolioAssistant`] operation. Nothing is remembered between
/// calls; per-call preferences come from the [`Context`].
pub struct PortfolioAgent {
    assistant: Arc<PortfolioAssistant>,
    router: SmartRouter,
}

impl PortfolioAgent {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self {
            assistant,
            router: SmartRouter::new(),
        }
    }

    pub fn assistant(&self) -> &PortfolioAssistant {
        &self.assistant
    }

    /// Assistant for this call, pinned to the context's reference date if any
    fn assistant_for(&self, context: &Context) -> Arc<PortfolioAssistant> {
        match context.reference_date().and_then(FixedClock::end_of_day) {
            Some(clock) => Arc::new(self.assistant.as_ref().clone().with_clock(Arc::new(clock))),
            None => {
                if let Some(raw) = context.reference_date() {
                    tracing::warn!(reference_date = raw, "ignoring unparseable reference date");
                }
                Arc::clone(&self.assistant)
            }
        }
    }

    /// Answer an utterance
    pub fn answer(&self, query: &str, context: &Context) -> String {
        let assistant = self.assistant_for(context);
        let routed = self.router.route(query);
        tracing::info!(
            session = context.session_id().unwrap_or("-"),
            intent = ?routed.intent,
            "answering"
        );
        self.dispatch(&assistant, query, &routed, context)
    }

    fn dispatch(
        &self,
        assistant: &PortfolioAssistant,
        query: &str,
        routed: &RoutingResult,
        context: &Context,
    ) -> String {
        let named = assistant.store().find_in_query(query).map(|c| c.name.clone());
        let filter = routed.filter.as_deref();

        match routed.intent {
            QueryIntent::Compare => assistant.compare(query),
            QueryIntent::News => {
                let Some(company) = named else {
                    return UNIDENTIFIED_COMPANY.to_string();
                };
                let news = NewsQuery {
                    limit: routed.limit,
                    brief: context
                        .news_brief()
                        .unwrap_or(assistant.config().news_brief),
                    ..NewsQuery::new(company)
                };
                assistant.news(&news)
            }
            QueryIntent::InvestmentStyle => {
                let style = match self.router.detect_thesis(query) {
                    ThesisKind::Collabfund => "collabfund",
                    ThesisKind::Personal => "personal",
                    ThesisKind::Both => "both",
                };
                assistant.investment_style(style)
            }
            QueryIntent::Membership => {
                let name = named
                    .or_else(|| self.router.membership_name(query))
                    .unwrap_or_else(|| query.trim().to_string());
                assistant.check_company(&name)
            }
            QueryIntent::Count => match self.router.detect_count(query) {
                CountBy::DeepTech => assistant.count_deep_tech(filter),
                CountBy::Status => assistant.count_by_status(filter),
                CountBy::Industry => assistant.count_by_industry(filter),
            },
            QueryIntent::Statistic => {
                let field = routed.field.unwrap_or(NumericField::Valuation);
                assistant.statistic(self.router.detect_statistic(query), field.name(), filter)
            }
            QueryIntent::Ranking => {
                let field = routed.field.unwrap_or(NumericField::Valuation);
                if field == NumericField::Valuation && filter.is_none() && !routed.ascending {
                    return assistant.top_by_valuation(routed.limit);
                }
                let mut request = RankRequest::new(field.name())
                    .limit(routed.limit.unwrap_or(assistant.config().default_limit))
                    .ascending(routed.ascending);
                if let Some(filter) = filter {
                    request = request.filter_query(filter);
                }
                assistant.rank(&request)
            }
            QueryIntent::Domains => assistant.domains(),
            QueryIntent::Thesis => match named {
                Some(name) => assistant.thesis_alignment(&name, self.router.detect_thesis(query)),
                None => UNIDENTIFIED_COMPANY.to_string(),
            },
            QueryIntent::Valuation => match named {
                Some(name) => assistant.valuation_summary(&name),
                None => assistant.top_by_valuation(routed.limit),
            },
            QueryIntent::Summary => assistant.summary_info(query),
            QueryIntent::General => {
                if named.is_none() {
                    assistant.search(query)
                } else if InfoSection::detect(query).is_some() {
                    assistant.specific_info(query)
                } else {
                    assistant.company_info(query)
                }
            }
        }
    }
}

#[async_trait]
impl Agent for PortfolioAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        if input.trim().is_empty() {
            return Err(agent_core::Error::InvalidParameters(
                "empty utterance".to_string(),
            ));
        }
        Ok(self.answer(&input, context))
    }

    fn name(&self) -> &str {
        "PortfolioAgent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortfolioConfig;
    use crate::store::PortfolioStore;
    use serde_json::json;
    use std::io::Write;

    fn agent_with_news() -> (PortfolioAgent, tempfile::NamedTempFile) {
        let mut news = tempfile::NamedTempFile::new().unwrap();
        write!(
            news,
            "{}",
            json!({
                "Orbit Labs": {"articles": [
                    {"title": "Orbit closes the year", "source": "Wired", "link": "https://w.example", "time": "Dec 31"},
                    {"title": "Orbit in January", "source": "Axios", "link": "https://a.example", "time": "Jan 20"}
                ]}
            })
        )
        .unwrap();

        let companies = serde_json::from_value(json!([
            {
                "name": "Orbit Labs",
                "status": "active",
                "industry_domains": ["Space"],
                "valuation": 2400,
                "excitement": 9,
                "deep_tech": true,
                "technological_complexity": 9,
                "collabfund_thesis_alignment": {"score": 8, "description": "Planetary data"},
                "zizo_thesis_alignment": {"score": 7, "description": "Billion-person reach"}
            },
            {
                "name": "Ledgerly",
                "status": "ipo",
                "industry_domains": ["Fintech"],
                "valuation": 800,
                "excitement": 6
            }
        ]))
        .unwrap();

        let config = PortfolioConfig::builder().news_path(news.path()).build().unwrap();
        let assistant = PortfolioAssistant::new(
            Arc::new(PortfolioStore::from_companies(companies)),
            Arc::new(config),
        );
        (PortfolioAgent::new(Arc::new(assistant)), news)
    }

    #[tokio::test]
    async fn test_routes_to_operations() {
        let (agent, _news) = agent_with_news();
        let mut ctx = Context::new();

        let answer = agent
            .process("Is Orbit Labs in your portfolio?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.starts_with("Yes, Orbit Labs is in our portfolio."));

        let answer = agent
            .process("Is Acme Robotics in your portfolio?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.starts_with("No, Acme Robotics is not currently in our portfolio."));

        let answer = agent
            .process("How many deep tech companies do we have?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert_eq!(answer, "There are 1 deep tech companies.");

        let answer = agent
            .process("What's the average excitement across fintech companies?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert_eq!(answer, "The average excitement score is 6.00/10.");

        let answer = agent
            .process("Top 1 companies by valuation".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.starts_with("Here are the top 1 companies by valuation:"));

        let answer = agent
            .process("Lowest excitement".to_string(), &mut ctx)
            .await
            .unwrap();
        assert_eq!(answer, "Top 2 companies by excitement:\n- Ledgerly: 6\n- Orbit Labs: 9");
    }

    #[tokio::test]
    async fn test_company_questions() {
        let (agent, _news) = agent_with_news();
        let mut ctx = Context::new();

        let answer = agent
            .process("How is Orbit Labs aligned with the personal thesis?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.starts_with("Personal Thesis Alignment for Orbit Labs:"));

        let answer = agent
            .process("What's the technological complexity of Orbit Labs?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert_eq!(answer, "Technological Complexity for Orbit Labs: 9/10");

        let answer = agent
            .process("compare Orbit Labs and Ledgerly".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.contains("Ledgerly:\n  Valuation: about $0.8 billion"));

        let answer = agent
            .process("Show me deep tech space companies".to_string(), &mut ctx)
            .await
            .unwrap();
        assert!(answer.starts_with("Here are the matching companies:\n- Orbit Labs"));
    }

    #[tokio::test]
    async fn test_news_uses_context_preferences() {
        let (agent, _news) = agent_with_news();
        let mut ctx = Context::new()
            .with_reference_date("2025-01-05")
            .with_news_brief(true);

        let answer = agent
            .process("Any news on Orbit Labs?".to_string(), &mut ctx)
            .await
            .unwrap();
        assert_eq!(
            answer,
            "News articles for Orbit Labs:\n\
             - Orbit closes the year (Wired, Dec 31): https://w.example\n\
             - Orbit in January (Axios, Jan 20): https://a.example"
        );
    }

    #[tokio::test]
    async fn test_empty_utterance_is_rejected() {
        let (agent, _news) = agent_with_news();
        let mut ctx = Context::new();
        let err = agent.process("   ".to_string(), &mut ctx).await.unwrap_err();
        assert!(matches!(err, agent_core::Error::InvalidParameters(_)));
        assert_eq!(agent.name(), "PortfolioAgent");
    }
}
