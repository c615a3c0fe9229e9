use crate::analysis::FileTreeNode;
use crate::cli::TreeArgs;
use crate::style;

use super::CommandContext;

pub fn cmd_tree(args: TreeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.target) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = match ctx.analyze() {
        Ok(result) => result,
        Err(code) => return code,
    };

    style::header(&result.repo.to_string());
    print!("{}", render_tree(&result.file_tree, args.depth));
    style::section(&format!(
        "{} folders, {} files",
        result.stats.total_folders, result.stats.total_files
    ));
    0
}

/// ASCII rendering of `root`: folders first, then files, both sorted by
/// name. Folders below `max_depth` are collapsed into a file count.
pub fn render_tree(root: &FileTreeNode, max_depth: Option<usize>) -> String {
    let mut out = String::new();
    render_children(root, "", 1, max_depth, &mut out);
    out
}

fn render_children(
    node: &FileTreeNode,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    out: &mut String,
) {
    let mut files: Vec<&str> = node.files.iter().map(|f| f.name()).collect();
    files.sort_unstable();
    let total = node.children.len() + files.len();

    for (i, child) in node.children.values().enumerate() {
        let last = i + 1 == total;
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        if max_depth.is_some_and(|max| depth >= max) {
            out.push_str(&format!(
                "{}{}{}/ ({} files)\n",
                prefix,
                branch,
                child.name,
                child.leaf_count()
            ));
            continue;
        }
        out.push_str(&format!("{}{}{}/\n", prefix, branch, child.name));
        render_children(child, &format!("{}{}", prefix, indent), depth + 1, max_depth, out);
    }

    for (i, name) in files.iter().enumerate() {
        let last = node.children.len() + i + 1 == total;
        let branch = if last { "└── " } else { "├── " };
        out.push_str(&format!("{}{}{}\n", prefix, branch, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_file_tree;
    use crate::model::TreeItem;

    fn tree() -> FileTreeNode {
        build_file_tree(&[
            TreeItem::tree("src"),
            TreeItem::blob("src/main.rs", 10),
            TreeItem::blob("src/ui/view.rs", 10),
            TreeItem::blob("README.md", 10),
            TreeItem::blob("Cargo.toml", 10),
        ])
    }

    #[test]
    fn test_render_full_tree() {
        let expected = "\
├── src/
│   ├── ui/
│   │   └── view.rs
│   └── main.rs
├── Cargo.toml
└── README.md
";
        assert_eq!(render_tree(&tree(), None), expected);
    }

    #[test]
    fn test_render_collapses_below_depth() {
        let expected = "\
├── src/ (2 files)
├── Cargo.toml
└── README.md
";
        assert_eq!(render_tree(&tree(), Some(1)), expected);
    }
}
