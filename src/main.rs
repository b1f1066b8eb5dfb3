// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod api;
mod cli;
mod config;
mod dates;
mod digest;
mod error;
mod pdf;
mod pipeline;
mod render;
mod sanitize;
mod types;
mod ui;

use api::ReadwiseClient;
use chrono::Local;
use pdf::{ChromeConverter, PdfConverter};
use pipeline::Pipeline;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Resolve required settings before touching the network
    let settings = match config::resolve_settings(&args, |name| std::env::var(name).ok()) {
        Ok(s) => s,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };
    let digest_config = config::build_config(&args);

    // Find the browser up front, but only complain about it once the HTML exists
    let converter = if digest_config.skip_pdf {
        None
    } else {
        Some(ChromeConverter::locate(
            digest_config.browser.as_deref(),
            digest_config.pdf_path.clone(),
            digest_config.virtual_time_budget,
        ))
    };
    let located = converter.as_ref().and_then(|c| c.as_ref().ok());

    let client = ReadwiseClient::new(&settings.token, &digest_config.api_base, digest_config.request_timeout);
    let pipeline = Pipeline::new(&client, located.map(|c| c as &dyn PdfConverter), digest_config.html_path.clone());

    let summary = match pipeline.run(settings.cutoff, Local::now().date_naive()) {
        Ok(summary) => summary,
        Err(e) => {
            ui::print_error(&e.to_string());
            if e.is_conversion() {
                ui::print_note(&format!("HTML file is still available at: {}", pipeline.html_path().display()));
            }
            std::process::exit(1);
        }
    };

    // The PDF stage was requested but no browser could be found
    if let Some(Err(e)) = converter {
        ui::print_error(&e.to_string());
        ui::print_note(&format!("HTML file is still available at: {}", summary.html_path.display()));
        std::process::exit(1);
    }

    println!("\n=== Summary ===");
    println!("Documents fetched: {}", summary.documents);
    println!("Articles:          {}", summary.articles);
    println!("Words:             {}", summary.total_word_count);
    println!("HTML:              {}", summary.html_path.display());
    if let Some(pdf) = summary.pdf_path {
        println!("PDF:               {}", pdf.display());
    }
}
