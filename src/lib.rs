//! Ground two informally described quantities into exact numbers with the
//! help of a language model, then compare them to each other and to a table
//! of sourced reference facts.

pub mod compare;
pub mod config;
pub mod console;
pub mod decimal;
pub mod error;
pub mod grounding;
pub mod oracle;
pub mod proposal;
pub mod reference;
pub mod report;
pub mod session;
pub mod shutdown;

pub use compare::{compare, Comparison};
pub use decimal::Decimal;
pub use error::{ConfigError, ConsoleError, DomainError, ParseError};
pub use grounding::{ground_quantity, GroundedQuantity};
pub use oracle::{ChatMessage, OracleReply, ValueOracle};
pub use reference::{top_matches, ReferenceFact, REFERENCE_FACTS};
