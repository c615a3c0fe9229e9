use crate::api::export;
use crate::cli::ExportArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;
use std::path::PathBuf;

use super::{CommandContext, report_error, write_output};

pub fn cmd_export(args: ExportArgs) -> i32 {
    let ctx = match CommandContext::new(&args.target) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = match ctx.analyze() {
        Ok(result) => result,
        Err(code) => return code,
    };

    let content = match export(&result, args.kind) {
        Ok(content) => content,
        Err(e) => {
            report_error(&e);
            return 1;
        }
    };

    if args.stdout {
        return write_output(None, &content, default_fs());
    }

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.kind.file_name(&result.repo.repo)));
    if default_fs().exists(&path) {
        style::warning(&format!("Overwriting {}", style::path(&path)));
    }
    write_output(Some(path.as_path()), &content, default_fs())
}
