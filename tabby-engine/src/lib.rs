//! Tabby Engine - templated payload generation and the request loop
//!
//! This crate holds everything the `tabby` command line tool needs apart from
//! the concrete HTTP client: placeholder parsing and rendering, the random
//! value generators, response formatting and the loop controller that ties
//! them together.

pub mod duration;
pub mod error;
pub mod execution;
pub mod format;
pub mod generators;
pub mod headers;
pub mod masking;
pub mod parser;
pub mod random;
pub mod renderer;
pub mod traits;
pub mod types;


pub use types::{
    BodySource, HttpHeaders, HttpMethod, HttpRequestData, HttpResponseData, IterationBudget,
    IterationResult, LoopConfig, RunSummary,
};

pub use traits::{FsTemplateSource, Reporter, TemplateSource, Transport};

pub use error::{ErrorCategory, TabbyError, TabbyResult};

pub use execution::{build_request, FailureDisposition, LoopState, RequestLoop};

pub use parser::{Placeholder, PlaceholderMatch, PlaceholderParser};

pub use generators::{GeneratorRegistry, PlaceholderInfo, PLACEHOLDER_CATALOG};

pub use renderer::{render, RenderOutput, TemplateRenderer};

pub use random::{RandomSource, SecureRandom};

pub use format::{format_body, pretty_json, IterationReport, ReportMode, LOOP_BODY_LIMIT};

pub use masking::MaskingConfig;

pub use duration::parse_interval;

pub use headers::{parse_header_entries, parse_header_entry};
