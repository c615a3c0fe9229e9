use crate::api::simulate_layout;
use crate::cli::GraphArgs;
use crate::fs::default_fs;
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_graph(args: GraphArgs) -> i32 {
    let ctx = match CommandContext::new(&args.target) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = match ctx.analyze() {
        Ok(result) => result,
        Err(code) => return code,
    };

    if result.files.len() > ctx.config.graph.max_files {
        style::hint(&format!(
            "Showing the first {} of {} files",
            ctx.config.graph.max_files,
            result.files.len()
        ));
    }

    let layout = simulate_layout(&result, ctx.config.graph, args.steps, args.seed);
    tracing::debug!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        energy = layout.metadata.kinetic_energy,
        "layout finished"
    );

    let json = match serde_json::to_string_pretty(&layout) {
        Ok(json) => json + "\n",
        Err(e) => {
            style::error(&format!("Failed to serialize layout: {}", e));
            return 1;
        }
    };

    write_output(args.output.as_deref(), &json, default_fs())
}
