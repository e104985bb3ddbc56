//! # bestshot
//!
//! Batch photo quality scoring and ranking library.
//!
//! bestshot scores a batch of photographs by computing six normalized
//! image-quality metrics (sharpness, noise, brightness, contrast,
//! saturation, composition), optionally combining them into a single
//! composite score, and ranking the batch by any metric to pick the best
//! shots.
//!
//! Data flows one-directionally: raster -> metrics -> composite -> ranked
//! list. Images are downscaled on decode, each image's pipeline is a single
//! unit of work dispatched in parallel across the batch, and per-image
//! failures drop that image without aborting the batch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bestshot::{BatchConfig, BatchInput, BatchSession, SortKey, rank};
//!
//! let config = BatchConfig::builder().compute_composite(true).build();
//! let session = BatchSession::new(config);
//!
//! let report = session.process(vec![
//!     BatchInput::Path("shots/one.jpg".into()),
//!     BatchInput::Path("shots/two.jpg".into()),
//! ]);
//!
//! let ranked = rank(report.results.clone(), SortKey::Composite)?;
//! for best in ranked.top() {
//!     println!("{}: {:.2}", best.name, best.composite.unwrap());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`raster`]: Image decoding and downscaling
//! - [`metrics`]: The six quality metrics
//! - [`score`]: Weights and the composite score
//! - [`rank`]: Ranking and top-K selection
//! - [`batch`]: Batch session, parallel dispatch, reports
//! - [`store`]: Injected transient storage for image bytes
//! - [`stats`]: Descriptive statistics over metric values

pub mod batch;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod raster;
pub mod score;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use batch::MAX_BATCH;
pub use batch::report::{BatchReport, PipelineEvent};
pub use batch::session::{BatchConfig, BatchInput, BatchSession};
pub use error::{Error, Result};
pub use metrics::{MetricSet, compute_metrics};
pub use rank::{RankedBatch, ScoredImage, SortKey, TOP_K, rank};
pub use raster::{Raster, decode_raster, load_raster};
pub use score::{Weights, composite_score};
pub use stats::Summary;
pub use store::{RasterStore, StoreHandle, TempStore};
