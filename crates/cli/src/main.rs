mod args;
mod config;
mod json;
mod logging;
mod markdown;
mod output;
mod path;
mod script;
mod text;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gas_dedupe_core::generate_duplication_report_with_stats;
use tracing::info;

use crate::args::{Cli, Command};
use crate::config::{load_config, scan_options};
use crate::json::{map_report, to_json};
use crate::markdown::render_markdown;
use crate::output::{JSON_REPORT, MARKDOWN_REPORT, MERGE_SCRIPT, Output, write_outputs};
use crate::path::{absolutize, resolve_roots};
use crate::script::render_merge_script;
use crate::text::{format_scan_stats, format_summary, has_fatal_skips};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(command: &Command) -> Result<ExitCode> {
    let args = command.scan_args();
    let roots = resolve_roots(&args.roots).context("failed to resolve roots")?;
    let primary = roots.first().context("no root to scan")?.clone();

    let file_config = load_config(args.config.as_deref(), &primary)?;
    let options = scan_options(&file_config, args);
    info!(
        roots = roots.len(),
        kind = ?options.script_kind,
        threshold = options.similarity_threshold,
        "starting scan"
    );

    let outcome = generate_duplication_report_with_stats(&roots, &options)?;
    let report = &outcome.result;
    let stats = &outcome.stats;

    let output_dir = match &args.output_dir {
        Some(dir) => absolutize(dir).context("failed to resolve output dir")?,
        None => primary,
    };

    let json = to_json(&map_report(report, stats)).context("failed to encode JSON report")?;
    let mut outputs = vec![
        Output {
            path: output_dir.join(MARKDOWN_REPORT),
            contents: render_markdown(report),
            executable: false,
        },
        Output {
            path: output_dir.join(JSON_REPORT),
            contents: json.clone(),
            executable: false,
        },
    ];
    if command.writes_merge_script() {
        outputs.push(Output {
            path: output_dir.join(MERGE_SCRIPT),
            contents: render_merge_script(report),
            executable: true,
        });
    }
    write_outputs(&outputs)?;

    let mut summary = format_summary(report);
    for output in &outputs {
        summary.push_str(&format!("Wrote {}\n", output.path.display()));
    }
    // Under `--json` stdout carries only the JSON report.
    if args.json {
        print!("{json}");
        eprint!("{summary}");
    } else {
        print!("{summary}");
    }

    if args.stats {
        eprint!("{}", format_scan_stats(stats));
    }
    if args.strict && has_fatal_skips(stats) {
        if !args.stats {
            eprint!("{}", format_scan_stats(stats));
        }
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
