//! Aggregate and count tools

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::parse_params;
use crate::aggregate::{CountBy, Statistic};
use crate::assistant::PortfolioAssistant;
use crate::error::PortfolioError;
use crate::fields::NumericField;

fn default_statistic() -> String {
    "average".to_string()
}

#[derive(Debug, Deserialize)]
struct StatisticParams {
    #[serde(default = "default_statistic")]
    statistic: String,
    field: String,
    #[serde(default)]
    filter_query: Option<String>,
}

/// Average or total of a numeric field
pub struct CalculateStatisticTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CalculateStatisticTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CalculateStatisticTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StatisticParams = parse_params(params)?;
        let statistic = Statistic::parse(&params.statistic).ok_or_else(|| {
            PortfolioError::InvalidParameters(format!(
                "unknown statistic '{}', expected average, total or count",
                params.statistic
            ))
        })?;

        Ok(json!(self.assistant.statistic(
            statistic,
            &params.field,
            params.filter_query.as_deref()
        )))
    }

    fn name(&self) -> &str {
        "calculate_statistic"
    }

    fn description(&self) -> &str {
        "Calculate the average or total of a numeric field (valuation, recent_raise, excitement, \
         thesis scores, potentials, complexity scores...) over the portfolio, optionally \
         narrowed by a free-text filter. Companies without a value are skipped."
    }

    fn input_schema(&self) -> Value {
        let fields: Vec<&str> = NumericField::ALL.iter().map(|f| f.name()).collect();
        json!({
            "type": "object",
            "properties": {
                "statistic": {
                    "type": "string",
                    "enum": ["average", "total", "count"],
                    "default": "average"
                },
                "field": {
                    "type": "string",
                    "enum": fields
                },
                "filter_query": {
                    "type": "string",
                    "description": "Free-text description narrowing the companies"
                }
            },
            "required": ["field"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountParams {
    by: CountBy,
    #[serde(default)]
    filter_query: Option<String>,
}

/// Deep tech, status and industry counts
pub struct CountCompaniesTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CountCompaniesTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CountCompaniesTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CountParams = parse_params(params)?;
        let filter = params.filter_query.as_deref();
        let answer = match params.by {
            CountBy::DeepTech => self.assistant.count_deep_tech(filter),
            CountBy::Status => self.assistant.count_by_status(filter),
            CountBy::Industry => self.assistant.count_by_industry(filter),
        };
        Ok(json!(answer))
    }

    fn name(&self) -> &str {
        "count_companies"
    }

    fn description(&self) -> &str {
        "Count portfolio companies: how many are deep tech, the breakdown by status \
         (active, IPO, exit), or the number per industry."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "by": {
                    "type": "string",
                    "enum": ["deep_tech", "status", "industry"]
                },
                "filter_query": {
                    "type": "string",
                    "description": "Free-text description narrowing the companies"
                }
            },
            "required": ["by"]
        })
    }
}
