//! Command-line front end for the portfolio voice assistant
//!
//! Every portfolio operation is a subcommand printing the sentence the voice
//! runtime would speak. `ask` routes a free-text utterance, `tools` prints
//! the function definitions and `call` invokes one tool with JSON parameters.

use agent_core::{Agent, Context};
use agent_portfolio::tools::register_all;
use agent_portfolio::{
    DateWindow, NewsQuery, PortfolioAgent, PortfolioAssistant, PortfolioConfig, RankRequest,
    Statistic, ThesisKind,
};
use agent_tools::ToolRegistry;
use anyhow::{Context as _, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(about = "Ask questions about the investment portfolio", long_about = None)]
struct Cli {
    /// Portfolio dataset (JSON array of company records)
    #[arg(long, global = true, env = "PORTFOLIO_DATA_PATH")]
    data: Option<PathBuf>,

    /// News file (JSON object keyed by company name)
    #[arg(long, global = true, env = "PORTFOLIO_NEWS_PATH")]
    news: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a free-text question
    Ask {
        query: String,
        /// Resolve year-less news dates against this day (YYYY-MM-DD)
        #[arg(long)]
        reference_date: Option<String>,
        /// Render news articles as blocks instead of single lines
        #[arg(long)]
        full_news: bool,
    },
    /// Check whether a company is in the portfolio
    Check { name: String },
    /// Thesis alignment for a company
    Thesis {
        name: String,
        #[arg(long, default_value = "both")]
        thesis_type: String,
    },
    /// Valuation and latest fundraising for a company
    Valuation { name: String },
    /// Highest valued companies
    Top {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Industry domains covered by the portfolio
    Domains,
    /// Rank companies by a numeric field
    Rank {
        field: String,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        ascending: bool,
        /// Free-text description narrowing the companies
        #[arg(long)]
        filter: Option<String>,
        /// Earliest fundraising announcement date (recent_raise only)
        #[arg(long)]
        start: Option<String>,
        /// Latest fundraising announcement date (recent_raise only)
        #[arg(long)]
        end: Option<String>,
        /// Only rank these companies
        #[arg(long, value_delimiter = ',')]
        companies: Vec<String>,
    },
    /// Companies matching a free-text description
    Search { query: String },
    /// Average, total or count of a numeric field
    Stat {
        /// average, total or count
        statistic: String,
        field: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Count companies
    Count {
        #[arg(value_enum)]
        by: CountArg,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Information about a company named in the query
    Info {
        query: String,
        #[arg(long, value_enum, default_value_t = InfoArg::General)]
        mode: InfoArg,
    },
    /// Compare two companies: "compare A and B"
    Compare { query: String },
    /// Recent news for a company
    News {
        company: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Render articles as blocks instead of single lines
        #[arg(long)]
        full: bool,
    },
    /// Describe the investment styles
    Style {
        #[arg(default_value = "both")]
        style: String,
    },
    /// Print the tool definitions as JSON
    Tools,
    /// Invoke a tool with JSON parameters
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        params: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CountArg {
    DeepTech,
    Status,
    Industry,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InfoArg {
    Full,
    Summary,
    Specific,
    General,
}

impl Cli {
    fn portfolio_config(&self) -> anyhow::Result<PortfolioConfig> {
        let mut builder = PortfolioConfig::builder();
        if let Some(path) = &self.data {
            builder = builder.data_path(path);
        }
        if let Some(path) = &self.news {
            builder = builder.news_path(path);
        }
        Ok(builder.with_env_paths().build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = agent_utils::Config::from_env();
    agent_utils::init_tracing_with(&app_config);

    let cli = Cli::parse();
    let config = cli.portfolio_config()?;
    info!(
        data = %config.data_path.display(),
        news = %config.news_path.display(),
        environment = %app_config.environment,
        "starting portfolio cli"
    );

    let assistant = Arc::new(
        PortfolioAssistant::from_config(config).context("failed to load the portfolio")?,
    );
    let answer = run(cli.command, assistant).await?;
    println!("{answer}");
    Ok(())
}

async fn run(command: Commands, assistant: Arc<PortfolioAssistant>) -> anyhow::Result<String> {
    let answer = match command {
        Commands::Ask {
            query,
            reference_date,
            full_news,
        } => {
            let agent = PortfolioAgent::new(assistant);
            let mut ctx = Context::new().with_session_id("cli");
            if let Some(date) = reference_date {
                ctx = ctx.with_reference_date(date);
            }
            if full_news {
                ctx = ctx.with_news_brief(false);
            }
            agent.process(query, &mut ctx).await?
        }
        Commands::Check { name } => assistant.check_company(&name),
        Commands::Thesis { name, thesis_type } => {
            assistant.thesis_alignment(&name, ThesisKind::parse(&thesis_type))
        }
        Commands::Valuation { name } => assistant.valuation_summary(&name),
        Commands::Top { limit } => assistant.top_by_valuation(limit),
        Commands::Domains => assistant.domains(),
        Commands::Rank {
            field,
            limit,
            ascending,
            filter,
            start,
            end,
            companies,
        } => {
            let mut request = RankRequest::new(field)
                .limit(limit.unwrap_or(assistant.config().default_limit))
                .ascending(ascending)
                .fixed_list(companies)
                .window(DateWindow::new(start, end));
            if let Some(filter) = filter {
                request = request.filter_query(filter);
            }
            assistant.rank(&request)
        }
        Commands::Search { query } => assistant.search(&query),
        Commands::Stat {
            statistic,
            field,
            filter,
        } => {
            let parsed = Statistic::parse(&statistic).ok_or_else(|| {
                anyhow!("unknown statistic '{statistic}', expected average, total or count")
            })?;
            assistant.statistic(parsed, &field, filter.as_deref())
        }
        Commands::Count { by, filter } => match by {
            CountArg::DeepTech => assistant.count_deep_tech(filter.as_deref()),
            CountArg::Status => assistant.count_by_status(filter.as_deref()),
            CountArg::Industry => assistant.count_by_industry(filter.as_deref()),
        },
        Commands::Info { query, mode } => match mode {
            InfoArg::Full => assistant.full_info(&query),
            InfoArg::Summary => assistant.summary_info(&query),
            InfoArg::Specific => assistant.specific_info(&query),
            InfoArg::General => assistant.company_info(&query),
        },
        Commands::Compare { query } => assistant.compare(&query),
        Commands::News {
            company,
            start,
            end,
            limit,
            full,
        } => assistant.news(&NewsQuery {
            start,
            end,
            limit,
            brief: !full && assistant.config().news_brief,
            ..NewsQuery::new(company)
        }),
        Commands::Style { style } => assistant.investment_style(&style),
        Commands::Tools => {
            let registry = registry(&assistant);
            serde_json::to_string_pretty(&registry.definitions())?
        }
        Commands::Call { tool, params } => {
            let registry = registry(&assistant);
            let tool = registry
                .get(&tool)
                .ok_or_else(|| anyhow!("unknown tool '{tool}', try one of: {}", registry.names().join(", ")))?;
            let params: Value =
                serde_json::from_str(&params).context("tool parameters must be JSON")?;
            match tool.execute(params).await? {
                Value::String(answer) => answer,
                other => serde_json::to_string_pretty(&other)?,
            }
        }
    };
    Ok(answer)
}

fn registry(assistant: &Arc<PortfolioAssistant>) -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_all(&registry, assistant);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank_arguments() {
        let cli = Cli::try_parse_from([
            "portfolio",
            "rank",
            "excitement",
            "--limit",
            "3",
            "--ascending",
            "--companies",
            "Helio Grid,Tally Finance",
            "--data",
            "fixtures/portfolio.json",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("fixtures/portfolio.json")));
        match cli.command {
            Commands::Rank {
                field,
                limit,
                ascending,
                companies,
                ..
            } => {
                assert_eq!(field, "excitement");
                assert_eq!(limit, Some(3));
                assert!(ascending);
                assert_eq!(companies, vec!["Helio Grid", "Tally Finance"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_count_and_info() {
        let cli = Cli::try_parse_from(["portfolio", "count", "deep-tech"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Count {
                by: CountArg::DeepTech,
                filter: None
            }
        ));

        let cli =
            Cli::try_parse_from(["portfolio", "info", "tell me about Helio Grid", "--mode", "full"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Info { mode: InfoArg::Full, .. }));

        assert!(Cli::try_parse_from(["portfolio", "count", "weather"]).is_err());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let assistant = Arc::new(PortfolioAssistant::new(
            Arc::new(agent_portfolio::PortfolioStore::default()),
            Arc::new(PortfolioConfig::default()),
        ));
        let err = run(
            Commands::Call {
                tool: "launch_rockets".to_string(),
                params: "{}".to_string(),
            },
            assistant,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("unknown tool 'launch_rockets'"));
    }
}
