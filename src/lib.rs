// Python Documentation Parser Library
//
// Crawls the Python documentation and the PEP index, extracts structured facts
// from their HTML and renders them as tables, CSV or JSON.

pub mod cache;
pub mod config;
pub mod error;
pub mod locator;
pub mod output;
pub mod parsers;
pub mod progress;
pub mod results;
pub mod session;
pub mod status;

// Re-export main types for convenience
pub use cache::{CachedResponse, HttpCache};
pub use config::Settings;
pub use error::{ParserError, Result};
pub use locator::{find_all, find_tag, AttrMatcher};
pub use output::{control_output, OutputMode};
pub use parsers::{run, Mode};
pub use results::{ResultRow, ResultTable};
pub use session::{join_url, CachedSession};
pub use status::{MismatchRecord, StatusAudit, StatusCounter};
