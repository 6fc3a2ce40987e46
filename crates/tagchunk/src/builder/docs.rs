//! Folding documentation chunks into the sibling they describe.

use std::borrow::Cow;

use super::nesting::Forest;

/// Documentation chunks to absorb into `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Attachment {
    pub(super) target: usize,
    pub(super) docs: Vec<usize>,
}

/// Finds every run of childless documentation chunks that directly
/// precedes a non-documentation sibling.
///
/// Only chunks count as separators: attributes, decorators and keywords
/// left untagged between a run and its target do not block attachment.
pub(super) fn plan<N>(forest: &Forest<'_, N>) -> Vec<Attachment> {
    let mut attachments = Vec::new();
    scan(&forest.roots, forest, &mut attachments);
    for node in &forest.nodes {
        scan(&node.children, forest, &mut attachments);
    }
    attachments
}

fn scan<N>(siblings: &[usize], forest: &Forest<'_, N>, out: &mut Vec<Attachment>) {
    let mut run: Vec<usize> = Vec::new();

    for &index in siblings {
        let Some(node) = forest.nodes.get(index) else {
            continue;
        };
        if !node.candidate.tag.is_documentation() {
            if !run.is_empty() {
                out.push(Attachment {
                    target: index,
                    docs: std::mem::take(&mut run),
                });
            }
            continue;
        }
        if node.children.is_empty() {
            run.push(index);
        } else {
            run.clear();
        }
    }
}

/// Joins the trimmed texts of the absorbed chunks with newlines.
pub(super) fn join<'s, N>(
    docs: &[usize],
    forest: &Forest<'_, N>,
    source: &'s str,
) -> Option<Cow<'s, str>> {
    let texts: Vec<&'s str> = docs
        .iter()
        .filter_map(|&index| forest.nodes.get(index))
        .filter_map(|node| source.get(node.candidate.span.byte_range()))
        .map(str::trim_end)
        .collect();
    match texts.as_slice() {
        [] => None,
        [single] => Some(Cow::Borrowed(*single)),
        _ => Some(Cow::Owned(texts.join("\n"))),
    }
}
