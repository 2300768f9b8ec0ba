//! Report generation.

pub mod generator;

pub use generator::{
    build_report, format_amount, format_currency, generate_json_report, generate_text_report,
};
