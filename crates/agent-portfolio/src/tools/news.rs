//! Company news tool

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::parse_params;
use crate::assistant::PortfolioAssistant;
use crate::news::NewsQuery;

#[derive(Debug, Deserialize)]
struct NewsParams {
    company_name: String,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
    /// Falls back to the configured rendering
    #[serde(default)]
    brief: Option<bool>,
}

/// Recent news articles for a company
pub struct CompanyNewsTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CompanyNewsTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CompanyNewsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: NewsParams = parse_params(params)?;
        let query = NewsQuery {
            start: params.start_date,
            end: params.end_date,
            limit: params.limit,
            brief: params
                .brief
                .unwrap_or(self.assistant.config().news_brief),
            ..NewsQuery::new(params.company_name)
        };
        Ok(json!(self.assistant.news(&query)))
    }

    fn name(&self) -> &str {
        "get_company_news"
    }

    fn description(&self) -> &str {
        "Get recent news articles about a portfolio company, newest first, optionally \
         within a date range."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": {
                    "type": "string",
                    "description": "The name of the company"
                },
                "start_date": {
                    "type": "string",
                    "description": "Earliest article date, e.g. 2024-12-01 or Dec 1, 2024"
                },
                "end_date": {
                    "type": "string",
                    "description": "Latest article date"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of articles"
                },
                "brief": {
                    "type": "boolean",
                    "description": "One line per article",
                    "default": true
                }
            },
            "required": ["company_name"]
        })
    }
}
