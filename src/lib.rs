//! # lungscan
//!
//! Classifies lung histopathology scans into adenocarcinoma, benign tissue or
//! squamous cell carcinoma with an ONNX model, and turns the model's scores
//! into a confidence-banded verdict with advisory text.
//!
//! Scores below 95% are rejected as "not a lung scan", 95% to 97% are reported
//! with a caution, and anything higher is reported plainly.
//!
//! ## Example
//!
//! ```no_run
//! use lungscan::{Config, Pipeline};
//!
//! # fn main() -> lungscan::Result<()> {
//! let mut pipeline = Pipeline::new(&Config::default())?;
//!
//! let verdict = pipeline.classify_file("scan.jpg")?;
//! println!("{}\n{}", verdict.headline, verdict.description);
//! # Ok(())
//! # }
//! ```
//!
//! The resolver can also be used on its own:
//!
//! ```
//! let verdict = lungscan::verdict::resolve(&[0.02, 0.98, 0.0]).unwrap();
//! assert_eq!(verdict.emphasis.as_str(), "safe");
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod verdict;

pub use error::{Error, Result};
pub use pipeline::{ClassifierWorker, Config, Pipeline};
pub use verdict::Verdict;
