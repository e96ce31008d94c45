//! Car Sales Analytics Dashboard
//!
//! Upload a CSV or XLSX file of car sales, filter it by colour and brand, and
//! view price metrics, charts and the filtered rows.
//!
//! ```text
//!  upload (.csv / .xlsx)
//!        │
//!        ▼
//!   data::loader      parse → DataFrame
//!   data::processor   clean "Price" → Float64
//!        │
//!        ▼
//!   pipeline::Dataset          immutable for the session
//!        │  + FilterState
//!        ▼
//!   data::filter → stats → DashboardView   (recomputed on every change)
//!        │
//!        ▼
//!   gui / charts / data::export
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod pipeline;
pub mod stats;
