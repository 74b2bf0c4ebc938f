//! Views over raw CBOM documents.
//!
//! CBOMs are produced by external scanners and only loosely follow the
//! CycloneDX schema, so documents stay as `serde_json::Value` and are read
//! through tolerant accessors instead of being deserialized into rigid
//! structs.
//!
//! ```ignore
//! let bom: serde_json::Value = serde_json::from_str(&content)?;
//! let expansion = expand_bom(&bom);
//! for detection in &expansion.detections {
//!     println!("{:?}", detection.display_name());
//! }
//! ```

mod detection;
mod inventory;
mod origin;
mod path;

pub use detection::*;
pub use inventory::*;
pub use origin::*;
pub use path::*;
