//! Data layer: tables, record types, loading, transforms and filtering.
//!
//! Architecture:
//! ```text
//!  .txt / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table (fixed column count)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  model    │  Table rows → GroupRecord / SpectralPoint
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────────┐
//!   │ filter, transform │  threshold, rad/s → Hz, linear → dB
//!   └───────────────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod transform;
