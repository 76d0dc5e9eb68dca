//! Portfolio question answering for a voice assistant
//!
//! This crate answers spoken questions about a venture portfolio from a
//! local dataset of company records and a local news file. It includes:
//!
//! - A record store with an industry vocabulary built once at load time
//! - A criteria extractor turning free text into a structured criteria map
//! - A predicate evaluator applying that map to the records
//! - Ranking by any numeric field, with missing values always ranked last
//! - Averages, totals and counts that distinguish "no data" from zero
//! - A news filter resolving year-less article dates against a clock
//!
//! # Architecture
//!
//! [`PortfolioAssistant`] composes the components into the public operations,
//! each returning the sentence to speak. The operations are exposed to the
//! voice runtime as [`agent_tools::Tool`]s (see [`tools::register_all`]) and
//! to free-text callers through [`PortfolioAgent`], which routes an utterance
//! with [`SmartRouter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_portfolio::{PortfolioAssistant, PortfolioConfig};
//!
//! let config = PortfolioConfig::builder().with_env_paths().build()?;
//! let assistant = PortfolioAssistant::from_config(config)?;
//!
//! println!("{}", assistant.check_company("Orbit Labs"));
//! println!("{}", assistant.search("deep tech climate companies with excitement above 8"));
//! ```

pub mod agent;
pub mod aggregate;
pub mod assistant;
pub mod config;
pub mod criteria;
pub mod dates;
pub mod error;
pub mod fields;
pub mod filter;
pub mod format;
pub mod model;
pub mod news;
pub mod ranking;
pub mod router;
pub mod store;
pub mod tools;

pub use agent::PortfolioAgent;
pub use aggregate::{Aggregate, CountBy, Statistic};
pub use assistant::{InfoSection, PortfolioAssistant, ThesisKind};
pub use config::PortfolioConfig;
pub use criteria::{CriteriaMap, CriterionValue, extract};
pub use dates::{Clock, FixedClock, SystemClock};
pub use error::{PortfolioError, Result};
pub use fields::NumericField;
pub use filter::evaluate;
pub use model::{Company, Status};
pub use news::{NewsQuery, NewsStore};
pub use ranking::{DateWindow, RankRequest};
pub use router::{QueryIntent, SmartRouter};
pub use store::{IndustryVocabulary, PortfolioStore};
