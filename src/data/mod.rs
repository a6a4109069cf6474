//! Data layer: roster model, loading, and the browse pipeline.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file, normalize headers → Roster
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  query, position/country sets, ranges → RosterView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   sort   │  one field, missing values last
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  pager   │  1-based fixed-size slice
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod pager;
pub mod sort;
pub mod view;
