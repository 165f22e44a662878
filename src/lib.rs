pub mod app;
pub mod classify;
pub mod cli;
pub mod config;
pub mod input;
pub mod output;
pub mod parser;
pub mod render;
pub mod utils;

pub use parser::{parse, ParsedReport, Section, SectionKind};
pub use render::{render, render_report, DisplayFragment, ReportView, StyleToken};

#[cfg(test)]
mod tests;
