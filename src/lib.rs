//! spc1 - SPC-1 style synthetic storage workload generator
//!
//! Synthesizes streams of storage I/O descriptors whose address
//! distribution, read/write mix, stream locality and arrival timing follow
//! the SPC-1 access model, at a scale set by the number of Business Scaling
//! Units (BSUs).
//!
//! # Architecture
//!
//! - **Workload model** (`config`): immutable scale configuration and
//!   distribution constants, validated once per run
//! - **Distributions** (`distribution`): ASU, address, transfer-size and
//!   inter-arrival samplers
//! - **Generator** (`generator`): per-context state producing descriptors
//!   with a monotonic virtual clock
//! - **Session** (`session`): publishes one configuration to many contexts
//! - **Worker** (`worker`): paced multi-context driver with statistics
//!
//! # Example
//!
//! ```
//! use spc1::{Generator, WorkloadConfig};
//! use std::sync::Arc;
//!
//! // 50 BSUs at 50 IOPS each, one context
//! let config = Arc::new(WorkloadConfig::new(50, 1, 4500, 4500, 1000)?);
//! let mut generator = Generator::new(config, 0);
//!
//! for _ in 0..10 {
//!     let io = generator.generate()?;
//!     println!("{}", io);
//! }
//! # Ok::<(), spc1::Spc1Error>(())
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod output;
pub mod session;
pub mod stats;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::workload::{Asu, WorkloadProfile};
pub use config::WorkloadConfig;
pub use error::Spc1Error;
pub use generator::descriptor::IoDescriptor;
pub use generator::Generator;
pub use session::Session;

/// Result type used by the workload model and generators
pub type Result<T> = std::result::Result<T, Spc1Error>;
