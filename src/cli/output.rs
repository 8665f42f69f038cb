//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::Colorize;
use termtree::Tree;

use crate::domain::{DataTree, MatchPlan};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// One node per path, items as leaves.
pub fn tree_view<T: Display>(label: &str, tree: &DataTree<T>) -> Tree<String> {
    let branches = tree.branches().map(|(path, items)| {
        Tree::new(format!("{} ({})", path, items.len()))
            .with_leaves(items.iter().map(ToString::to_string))
    });
    Tree::new(label.to_string()).with_leaves(branches)
}

/// One node per visited path with its step count.
pub fn plan_view(plan: &MatchPlan) -> Tree<String> {
    let paths = plan
        .per_path()
        .map(|(path, count)| Tree::new(format!("{} x{}", path, count)));
    Tree::new(format!("plan: {} steps", plan.len())).with_leaves(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessSpec, PathMatcher};

    #[test]
    fn given_tree_when_rendering_then_lists_paths_and_items() {
        let tree = DataTree::from_branches(vec![(vec![0], vec![1, 2]), (vec![1], vec![3])])
            .expect("valid tree");

        let rendered = tree_view("a", &tree).to_string();

        assert!(rendered.starts_with("a\n"));
        assert!(rendered.contains("{0} (2)"));
        assert!(rendered.contains("{1} (1)"));
        assert!(rendered.contains('3'));
    }

    #[test]
    fn given_plan_when_rendering_then_shows_step_counts() {
        let tree = DataTree::from_branches(vec![(vec![0], vec![1, 2]), (vec![1], vec![3])])
            .expect("valid tree");
        let plan = PathMatcher::default()
            .plan(&[(&tree, AccessSpec::Item)])
            .expect("plan");

        let rendered = plan_view(&plan).to_string();

        assert!(rendered.starts_with("plan: 3 steps"));
        assert!(rendered.contains("{0} x2"));
        assert!(rendered.contains("{1} x1"));
    }
}
