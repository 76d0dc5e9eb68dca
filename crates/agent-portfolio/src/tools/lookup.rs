//! Tools answering questions about one or two named companies

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::parse_params;
use crate::assistant::{PortfolioAssistant, ThesisKind};

fn default_both() -> String {
    "both".to_string()
}

#[derive(Debug, Deserialize)]
struct CompanyParams {
    company_name: String,
}

fn company_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "company_name": {
                "type": "string",
                "description": description
            }
        },
        "required": ["company_name"]
    })
}

/// Portfolio membership check
pub struct CheckCompanyTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CheckCompanyTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CheckCompanyTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CompanyParams = parse_params(params)?;
        Ok(json!(self.assistant.check_company(&params.company_name)))
    }

    fn name(&self) -> &str {
        "check_portfolio_company"
    }

    fn description(&self) -> &str {
        "Check if a company is in the portfolio."
    }

    fn input_schema(&self) -> Value {
        company_schema("The name of the company to check")
    }
}

#[derive(Debug, Deserialize)]
struct ThesisParams {
    company_name: String,
    #[serde(default = "default_both")]
    thesis_type: String,
}

/// Thesis alignment score and analysis
pub struct ThesisAlignmentTool {
    assistant: Arc<PortfolioAssistant>,
}

impl ThesisAlignmentTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for ThesisAlignmentTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ThesisParams = parse_params(params)?;
        let kind = ThesisKind::parse(&params.thesis_type);
        Ok(json!(self.assistant.thesis_alignment(&params.company_name, kind)))
    }

    fn name(&self) -> &str {
        "check_thesis_alignment"
    }

    fn description(&self) -> &str {
        "Check how well a company aligns with the Collaborative Fund thesis, the personal thesis, or both."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": {
                    "type": "string",
                    "description": "The name of the company"
                },
                "thesis_type": {
                    "type": "string",
                    "enum": ["collabfund", "personal", "both"],
                    "default": "both"
                }
            },
            "required": ["company_name"]
        })
    }
}

/// Valuation and latest fundraising
pub struct ValuationTool {
    assistant: Arc<PortfolioAssistant>,
}

impl ValuationTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for ValuationTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CompanyParams = parse_params(params)?;
        Ok(json!(self.assistant.valuation_summary(&params.company_name)))
    }

    fn name(&self) -> &str {
        "get_company_valuation"
    }

    fn description(&self) -> &str {
        "Get valuation and fundraising details for a specific company."
    }

    fn input_schema(&self) -> Value {
        company_schema("The name of the company")
    }
}

/// Industry labels across the portfolio
pub struct DomainsTool {
    assistant: Arc<PortfolioAssistant>,
}

impl DomainsTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for DomainsTool {
    async fn execute(&self, _params: Value) -> AgentResult<Value> {
        Ok(json!(self.assistant.domains()))
    }

    fn name(&self) -> &str {
        "get_domains"
    }

    fn description(&self) -> &str {
        "List the industry domains covered by the portfolio."
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }
}

/// How much detail `get_company_info` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoMode {
    /// The stored record as JSON
    Full,
    /// One section picked from the question
    Specific,
    /// Short overview
    Summary,
    /// Notes, valuation, thesis or a general overview
    #[default]
    General,
}

#[derive(Debug, Deserialize)]
struct InfoParams {
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    mode: InfoMode,
}

/// Company details in several modes
pub struct CompanyInfoTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CompanyInfoTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CompanyInfoTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: InfoParams = parse_params(params)?;
        // Free-text modes look for the company inside the question, so a bare
        // name works as a question too.
        let text = params
            .query
            .or(params.company_name)
            .unwrap_or_default();

        let answer = match params.mode {
            InfoMode::Full => self.assistant.full_info(&text),
            InfoMode::Specific => self.assistant.specific_info(&text),
            InfoMode::Summary => self.assistant.summary_info(&text),
            InfoMode::General => self.assistant.company_info(&text),
        };
        Ok(json!(answer))
    }

    fn name(&self) -> &str {
        "get_company_info"
    }

    fn description(&self) -> &str {
        "Answer a question about one company: the full record, one specific aspect \
         (defensibility, competitors, excitement, complexity scores...), a short summary, \
         or a general overview including notes, valuation and thesis."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": {
                    "type": "string",
                    "description": "The company, for full mode"
                },
                "query": {
                    "type": "string",
                    "description": "The question as asked, naming the company"
                },
                "mode": {
                    "type": "string",
                    "enum": ["full", "specific", "summary", "general"],
                    "default": "general"
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    query: String,
}

/// Side-by-side comparison of two companies
pub struct CompareCompaniesTool {
    assistant: Arc<PortfolioAssistant>,
}

impl CompareCompaniesTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for CompareCompaniesTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CompareParams = parse_params(params)?;
        Ok(json!(self.assistant.compare(&params.query)))
    }

    fn name(&self) -> &str {
        "compare_companies"
    }

    fn description(&self) -> &str {
        "Compare two portfolio companies from a phrase like 'compare A and B' or 'compare A vs B'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The comparison request, e.g. 'compare Orbit Labs and Ledgerly'"
                }
            },
            "required": ["query"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct StyleParams {
    #[serde(default = "default_both")]
    style_type: String,
}

/// Description of the investment styles
pub struct InvestmentStyleTool {
    assistant: Arc<PortfolioAssistant>,
}

impl InvestmentStyleTool {
    pub fn new(assistant: Arc<PortfolioAssistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Tool for InvestmentStyleTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StyleParams = parse_params(params)?;
        Ok(json!(self.assistant.investment_style(&params.style_type)))
    }

    fn name(&self) -> &str {
        "get_investment_style"
    }

    fn description(&self) -> &str {
        "Describe the Collaborative Fund investment style, the personal investment style, or both."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "style_type": {
                    "type": "string",
                    "enum": ["collabfund", "personal", "both"],
                    "default": "both"
                }
            }
        })
    }
}
