//! Jobmatch SDK - Rust Client Library
//!
//! Typed client for the Jobmatch `/api/v1` HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use jobmatch_sdk::{JobmatchClient, ListParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobmatchClient::connect("http://127.0.0.1:8080")?;
//!
//!     let page = client
//!         .recommended_jobs(42, &ListParams::default().filter("active : true"))
//!         .await?;
//!
//!     println!("{} of {} jobs", page.result.len(), page.meta.total);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::JobmatchClient;
pub use error::{Result, SdkError};
pub use types::{Job, JobPayload, ListParams, Page, PageMeta};
