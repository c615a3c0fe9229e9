use crate::analysis::health_tips;
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::fs::default_fs;
use crate::model::AnalysisResult;
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::io;

use super::{CommandContext, write_output};

pub fn cmd_analyze(args: AnalyzeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.target) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = match ctx.analyze() {
        Ok(result) => result,
        Err(code) => return code,
    };

    let report = match format_report(&result, args.format) {
        Ok(report) => report,
        Err(e) => {
            style::error(&format!("Failed to format output: {}", e));
            return 1;
        }
    };

    // Render markdown nicely to terminal, or write plain text to file/pipe
    if args.output.is_none() && args.format == OutputFormat::Markdown {
        if let Err(e) = style::render_markdown(&report, &mut io::stdout()) {
            style::error(&format!("Failed to write output: {}", e));
            return 1;
        }
        print_summary(&result);
        return 0;
    }

    write_output(args.output.as_deref(), &report, default_fs())
}

fn format_report(result: &AnalysisResult, format: OutputFormat) -> io::Result<String> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Markdown => MarkdownOutput::new().format(result, &mut buffer)?,
        OutputFormat::Json => JsonOutput::full().format(result, &mut buffer)?,
    }
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn print_summary(result: &AnalysisResult) {
    let perf = &result.performance;
    style::section("Summary");
    println!("{}", style::metric("Health", result.stats.health_band().message()));
    println!(
        "{}",
        style::metric("Complexity", result.metrics.complexity_band().message())
    );
    println!(
        "{}",
        style::metric(
            "Estimated bundle",
            format!("{} KB", perf.bundle_size.total / 1024)
        )
    );
    if !result.secrets.is_empty() {
        style::warning(&format!(
            "{} file(s) look like they may contain secrets",
            result.secrets.len()
        ));
    }
    for tip in health_tips(&result.files, result.stats.large_file_count) {
        style::hint(tip);
    }
}
