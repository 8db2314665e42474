//! Plain-text report of an enumeration

use crate::cost::{edit_cost, edit_script, min_cost};
use crate::mapping::Mapping;
use crate::search::{Enumeration, SearchStatus};
use crate::tree::Tree;
use std::io::{self, Write};

/// What to include in a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Print only the minimum-cost mapping instead of every mapping
    pub min_only: bool,
    /// Print the edit script of the minimum-cost mapping
    pub script: bool,
}

/// Write the numbered mappings, their costs and the summary lines
pub fn write_report<W: Write>(
    out: &mut W,
    t1: &Tree,
    t2: &Tree,
    result: &Enumeration,
    options: &ReportOptions,
) -> io::Result<()> {
    let best = min_cost(t1, t2, &result.solutions);

    for (index, mapping) in result.solutions.iter().enumerate() {
        if options.min_only && best.is_none_or(|(best_index, _)| best_index != index) {
            continue;
        }
        write_mapping(out, t1, t2, index, mapping)?;
    }

    writeln!(out, "Number of valid mappings: {}", result.solutions.len())?;
    if let Some((index, cost)) = best {
        writeln!(
            out,
            "Minimum edit distance: {} (mapping {})",
            cost.total(),
            index + 1
        )?;

        if options.script
            && let Some(mapping) = result.solutions.get(index)
        {
            writeln!(out, "Edit script:")?;
            for op in edit_script(t1, t2, mapping) {
                writeln!(out, "  {}", op.describe(t1, t2))?;
            }
        }
    }

    match result.status {
        SearchStatus::Complete => {}
        SearchStatus::StepLimitReached => writeln!(
            out,
            "Search truncated: step limit reached after {} steps",
            result.steps
        )?,
        SearchStatus::SolutionLimitReached => {
            writeln!(out, "Search truncated: solution limit reached")?
        }
        SearchStatus::Stopped => writeln!(out, "Search stopped early")?,
    }

    Ok(())
}

fn write_mapping<W: Write>(
    out: &mut W,
    t1: &Tree,
    t2: &Tree,
    index: usize,
    mapping: &Mapping,
) -> io::Result<()> {
    writeln!(out, "Mapping {}:", index + 1)?;
    for (v, w) in mapping.iter() {
        writeln!(out, "  {} -> {}", t1.display_label(v), t2.display_label(w))?;
    }
    writeln!(out, "  cost: {}", edit_cost(t1, t2, mapping))?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_tree;
    use crate::search::{SearchOptions, enumerate, enumerate_with};

    fn render(t1: &str, t2: &str, search: SearchOptions, options: ReportOptions) -> String {
        let t1 = parse_tree(t1).unwrap();
        let mut t2 = parse_tree(t2).unwrap();
        let result = enumerate_with(&t1, &mut t2, search);

        let mut out = Vec::new();
        write_report(&mut out, &t1, &t2, &result, &options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_report() {
        let text = render("a", "a", SearchOptions::default(), ReportOptions::default());
        let expected = "\
Mapping 1:
  a -> lambda
  cost: 2 (deletions: 1, insertions: 1, substitutions: 0)

Mapping 2:
  a -> a
  cost: 0 (deletions: 0, insertions: 0, substitutions: 0)

Number of valid mappings: 2
Minimum edit distance: 0 (mapping 2)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_real_lambda_label_differs_from_deletion() {
        let text = render("a", "lambda", SearchOptions::default(), ReportOptions::default());

        assert!(text.contains("Mapping 1:\n  a -> lambda\n"));
        assert!(text.contains("Mapping 2:\n  a -> \"lambda\"\n"));
    }

    #[test]
    fn test_min_only_with_script() {
        let options = ReportOptions {
            min_only: true,
            script: true,
        };
        let text = render("a(b)", "a", SearchOptions::default(), options);

        assert!(!text.contains("Mapping 1:"));
        assert!(text.contains("Mapping 2:\n  a -> a\n  b -> lambda\n"));
        assert!(text.contains("Number of valid mappings: 2\n"));
        assert!(text.contains("Minimum edit distance: 1 (mapping 2)\n"));
        assert!(text.ends_with("Edit script:\n  keep(a, a)\n  del(b, lambda)\n"));
    }

    #[test]
    fn test_truncation_line() {
        let search = SearchOptions {
            max_solutions: Some(1),
            ..Default::default()
        };
        let text = render("r(x, y)", "r(y, x)", search, ReportOptions::default());

        assert!(text.contains("Number of valid mappings: 1\n"));
        assert!(text.ends_with("Search truncated: solution limit reached\n"));
    }

    #[test]
    fn test_step_limit_line() {
        let search = SearchOptions {
            max_steps: Some(3),
            ..Default::default()
        };
        let text = render("a(b)", "a(b)", search, ReportOptions::default());
        assert!(text.ends_with("Search truncated: step limit reached after 3 steps\n"));
    }

    #[test]
    fn test_empty_source_report() {
        let t1 = Tree::new();
        let mut t2 = parse_tree("a(b)").unwrap();
        let result = enumerate(&t1, &mut t2);

        let mut out = Vec::new();
        write_report(&mut out, &t1, &t2, &result, &ReportOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Mapping 1:\n  cost: 2 "));
        assert!(text.contains("Minimum edit distance: 2 (mapping 1)\n"));
    }
}
