//! Untagged text around chunks: attribute, decorator and comment lines.

use tagchunk_core::Span;

use super::nesting::Forest;

/// Trivia collected for one forest node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Trivia<'s> {
    pub(super) leading: Vec<&'s str>,
    pub(super) trailing: Vec<&'s str>,
}

/// Collects trivia for every node, indexed like `forest.nodes`.
///
/// Leading trivia is the block of non-blank lines directly above a chunk,
/// bounded by the previous sibling or the parent's first line. Trailing
/// trivia is whatever follows the chunk on its last line, bounded by the
/// next sibling or the parent's end.
pub(super) fn collect<'s, N>(forest: &Forest<'_, N>, source: &'s str) -> Vec<Trivia<'s>> {
    let mut trivia = vec![Trivia::default(); forest.nodes.len()];
    scan(&forest.roots, None, forest, source, &mut trivia);
    for node in &forest.nodes {
        scan(
            &node.children,
            Some(node.candidate.span),
            forest,
            source,
            &mut trivia,
        );
    }
    trivia
}

fn scan<'s, N>(
    siblings: &[usize],
    parent: Option<Span>,
    forest: &Forest<'_, N>,
    source: &'s str,
    out: &mut [Trivia<'s>],
) {
    let spans: Vec<(usize, Span)> = siblings
        .iter()
        .filter_map(|&index| forest.nodes.get(index).map(|node| (index, node.candidate.span)))
        .collect();

    for (position, &(index, span)) in spans.iter().enumerate() {
        let previous = position
            .checked_sub(1)
            .and_then(|before| spans.get(before))
            .map(|&(_, before)| before.end_byte);
        let next = spans.get(position + 1).map(|&(_, after)| after.start_byte);

        let (lower, keep_first_line) = match (previous, parent) {
            (Some(end), _) => (end, starts_line(source, end)),
            (None, Some(outer)) => (outer.start_byte, false),
            (None, None) => (0, true),
        };
        let upper = next
            .or(parent.map(|outer| outer.end_byte))
            .unwrap_or(source.len());

        if let Some(slot) = out.get_mut(index) {
            slot.leading = leading(source, lower, span.start_byte, keep_first_line);
            slot.trailing = trailing(source, span.end_byte, upper);
        }
    }
}

/// `true` when `offset` sits at the start of a line.
fn starts_line(source: &str, offset: usize) -> bool {
    offset == 0
        || source
            .get(..offset)
            .is_some_and(|before| before.ends_with('\n'))
}

fn leading(source: &str, lower: usize, start: usize, keep_first_line: bool) -> Vec<&str> {
    let Some(gap) = source.get(lower..start) else {
        return Vec::new();
    };
    let mut lines: Vec<&str> = gap.split('\n').collect();
    // The last segment shares a line with the chunk itself.
    lines.pop();
    if !keep_first_line && !lines.is_empty() {
        // The first segment shares a line with the preceding text.
        lines.remove(0);
    }

    let mut block: Vec<&str> = lines
        .iter()
        .rev()
        .map(|line| line.trim())
        .take_while(|line| !line.is_empty())
        .collect();
    block.reverse();
    block
}

fn trailing(source: &str, end: usize, upper: usize) -> Vec<&str> {
    if starts_line(source, end) {
        return Vec::new();
    }
    source
        .get(end..upper.max(end))
        .and_then(|rest| rest.split('\n').next())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .into_iter()
        .collect()
}
