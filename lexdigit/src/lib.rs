//! lexdigit - Legal document digitization toolkit
//!
//! Turns model-extracted legal text into structured exports. Raw model
//! responses are repaired into JSON, validated against the document model
//! and rendered as Markdown, LaTeX, Akoma Ntoso XML, HTML or JSON, driven
//! by an explicit per-document [`session::Session`].

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::enum_variant_names)]

pub mod cli;
pub mod config;
pub mod index_tree;
pub mod law_model;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod repair;
pub mod response;
pub mod retry;
pub mod roadmap;
pub mod selection;
pub mod session;
pub mod source;

// Exporters
pub mod export;
pub mod html_exporter;
pub mod json_exporter;
pub mod latex_exporter;
pub mod markdown_exporter;
pub mod snapshot_exporter;
pub mod xml_exporter;
