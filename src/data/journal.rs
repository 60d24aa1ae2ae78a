//! The nested journal tree and the labeled-section search over it.
//!
//! The notes service returns a journal page as nested lists of text: a block with
//! children becomes a list holding the block's text followed by a list of its children.
//! Finding a section means finding the list whose text names it and flattening what
//! sits under it.

/// A node of the journal tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalNode {
    Text(String),
    List(Vec<JournalNode>),
}

impl JournalNode {
    pub fn text(value: impl Into<String>) -> Self {
        JournalNode::Text(value.into())
    }

    fn matches(&self, keyword: &str) -> bool {
        match self {
            JournalNode::Text(text) => text.to_lowercase().contains(keyword),
            JournalNode::List(_) => false,
        }
    }
}

/// Outcome of a section search.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    /// The section's body items, before any offset is applied.
    Found(&'a [JournalNode]),
    NotFound,
}

/// Searches the tree depth-first, in document order, for the first list that directly
/// contains a text leaf matching `keyword` (case-insensitive).
///
/// The body of the matching list is its trailing nested list when it has one (the
/// children of the heading block), otherwise the items that follow the matching leaf.
pub fn find_section<'a>(nodes: &'a [JournalNode], keyword: &str) -> Section<'a> {
    let keyword = keyword.to_lowercase();
    search(nodes, &keyword)
}

fn search<'a>(nodes: &'a [JournalNode], keyword: &str) -> Section<'a> {
    for (position, node) in nodes.iter().enumerate() {
        match node {
            JournalNode::Text(_) if node.matches(keyword) => {
                return Section::Found(section_body(nodes, position));
            }
            JournalNode::List(children) => {
                if let found @ Section::Found(_) = search(children, keyword) {
                    return found;
                }
            }
            JournalNode::Text(_) => {}
        }
    }

    Section::NotFound
}

fn section_body(nodes: &[JournalNode], heading: usize) -> &[JournalNode] {
    match nodes.last() {
        Some(JournalNode::List(children)) if heading + 1 < nodes.len() => children,
        _ => &nodes[heading + 1..],
    }
}

/// Flattens nodes depth-first into their text leaves.
pub fn flatten(nodes: &[JournalNode]) -> Vec<String> {
    let mut lines = Vec::new();
    collect(nodes, &mut lines);
    lines
}

fn collect(nodes: &[JournalNode], lines: &mut Vec<String>) {
    for node in nodes {
        match node {
            JournalNode::Text(text) => lines.push(text.clone()),
            JournalNode::List(children) => collect(children, lines),
        }
    }
}

/// Finds a section and flattens its body, skipping the first `start_offset` body items.
///
/// Returns `None` when no list names the section.
///
/// # Examples
///
/// ```
/// use bitacora::data::journal::{section_lines, JournalNode};
///
/// let tree = vec![
///     JournalNode::text("Morning pages"),
///     JournalNode::List(vec![
///         JournalNode::text("Day logs"),
///         JournalNode::List(vec![
///             JournalNode::text("Ran 5k"),
///             JournalNode::List(vec![JournalNode::text("New best time")]),
///         ]),
///     ]),
/// ];
///
/// let lines = section_lines(&tree, "day logs", 0).unwrap();
/// assert_eq!(lines, vec!["Ran 5k", "New best time"]);
/// ```
pub fn section_lines(nodes: &[JournalNode], keyword: &str, start_offset: usize) -> Option<Vec<String>> {
    match find_section(nodes, keyword) {
        Section::Found(body) => {
            let remainder = body.get(start_offset..).unwrap_or(&[]);
            Some(flatten(remainder))
        }
        Section::NotFound => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> JournalNode {
        JournalNode::text(value)
    }

    fn list(nodes: Vec<JournalNode>) -> JournalNode {
        JournalNode::List(nodes)
    }

    fn journal() -> Vec<JournalNode> {
        vec![
            list(vec![
                text("Day logs"),
                list(vec![text("08:00 am Gym"), text("12:30 pm Lunch with Sam")]),
            ]),
            list(vec![
                text("Night Reflection"),
                list(vec![
                    text("What went well?"),
                    text("What could improve?"),
                    text("Shipped the release"),
                    list(vec![text("Team was happy"), list(vec![text("Cake!")])]),
                ]),
            ]),
        ]
    }

    #[test]
    fn test_find_section_matches_case_insensitively() {
        let tree = journal();
        match find_section(&tree, "NIGHT reflection") {
            Section::Found(body) => assert_eq!(body.len(), 4),
            Section::NotFound => panic!("Expected the night reflection section"),
        }
    }

    #[test]
    fn test_find_section_not_found() {
        let tree = journal();
        assert_eq!(find_section(&tree, "gratitude"), Section::NotFound);
        assert_eq!(section_lines(&tree, "gratitude", 0), None);
    }

    #[test]
    fn test_section_lines_with_offset() {
        let tree = journal();
        let lines = section_lines(&tree, "night reflection", 2).unwrap();
        assert_eq!(lines, vec!["Shipped the release", "Team was happy", "Cake!"]);
    }

    #[test]
    fn test_section_lines_without_offset() {
        let tree = journal();
        let lines = section_lines(&tree, "day logs", 0).unwrap();
        assert_eq!(lines, vec!["08:00 am Gym", "12:30 pm Lunch with Sam"]);
    }

    #[test]
    fn test_offset_past_end_yields_empty() {
        let tree = journal();
        assert_eq!(section_lines(&tree, "day logs", 10), Some(vec![]));
    }

    #[test]
    fn test_flat_section_uses_following_items() {
        let tree = vec![text("intro"), text("Day logs:"), text("one"), text("two")];
        assert_eq!(
            section_lines(&tree, "day logs", 0),
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_heading_alone_has_empty_body() {
        let tree = vec![list(vec![text("intro")]), list(vec![text("Day logs")])];
        assert_eq!(section_lines(&tree, "day logs", 0), Some(vec![]));
    }

    #[test]
    fn test_first_match_in_document_order_wins() {
        let tree = vec![
            list(vec![text("Day logs (draft)"), list(vec![text("first")])]),
            list(vec![text("Day logs"), list(vec![text("second")])]),
        ];
        assert_eq!(
            section_lines(&tree, "day logs", 0),
            Some(vec!["first".to_string()])
        );
    }

    #[test]
    fn test_earlier_nested_match_beats_later_sibling_text() {
        let tree = vec![
            list(vec![text("Day logs"), list(vec![text("nested")])]),
            text("Day logs"),
            text("top level"),
        ];
        assert_eq!(
            section_lines(&tree, "day logs", 0),
            Some(vec!["nested".to_string()])
        );
    }

    #[test]
    fn test_flatten_preserves_depth_first_order() {
        let tree = vec![text("a"), list(vec![text("b"), list(vec![text("c")])]), text("d")];
        assert_eq!(flatten(&tree), vec!["a", "b", "c", "d"]);
    }
}
