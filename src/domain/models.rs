use std::fmt;

use super::value_objects::ChatRole;
use crate::symbolic::Solution;

/// Raw equation text as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationRequest {
    pub equation: String,
}

impl EquationRequest {
    pub fn new(equation: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
        }
    }
}

/// Distinct solutions of an equation in `x`, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
}

impl SolutionSet {
    pub fn new(solutions: Vec<Solution>) -> Self {
        Self { solutions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.iter()
    }

    /// Number of solutions on the real line
    pub fn real_count(&self) -> usize {
        self.solutions
            .iter()
            .filter(|s| match s {
                Solution::Rational(_) => true,
                Solution::Surd(surd) => surd.is_real(),
            })
            .count()
    }

    /// Rendered solutions, e.g. `["-2", "2"]`
    pub fn to_strings(&self) -> Vec<String> {
        self.solutions.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for SolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_strings().join(", "))
    }
}

/// One turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// Non-empty, ordered list of chat messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Returns `None` for an empty message list
    pub fn new(messages: Vec<ChatMessage>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Header and leading rows of an uploaded table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularPreview {
    pub filename: String,
    pub columns: Vec<String>,
    /// Total number of data rows, header excluded
    pub row_count: usize,
    /// First rows, one cell per column; `None` where a row is short
    pub rows: Vec<Vec<Option<String>>>,
}

impl TabularPreview {
    pub fn new(filename: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            columns,
            row_count: 0,
            rows: Vec::new(),
        }
    }

    /// Counts a data row and keeps it while fewer than `limit` are held.
    /// Cells beyond the header width are dropped; short rows are padded.
    pub fn push_row(&mut self, cells: Vec<String>, limit: usize) {
        self.row_count += 1;
        if self.rows.len() >= limit {
            return;
        }

        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .take(self.columns.len())
            .map(Some)
            .collect();
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu::integer::IBig;
    use dashu::rational::RBig;

    #[test]
    fn test_solution_set_display() {
        assert_eq!(SolutionSet::empty().to_string(), "[]");

        let set = SolutionSet::new(vec![
            Solution::Rational(RBig::from(IBig::from(-2))),
            Solution::Rational(RBig::from(IBig::from(2))),
        ]);
        assert_eq!(set.to_string(), "[-2, 2]");
        assert_eq!(set.len(), 2);
        assert_eq!(set.real_count(), 2);
    }

    #[test]
    fn test_conversation_rejects_empty() {
        assert!(Conversation::new(Vec::new()).is_none());
        let conversation = Conversation::new(vec![ChatMessage::user("hi")]).unwrap();
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_preview_pads_and_limits_rows() {
        let mut preview = TabularPreview::new("t.csv", vec!["a".to_string(), "b".to_string()]);
        preview.push_row(vec!["1".to_string()], 2);
        preview.push_row(vec!["2".to_string(), "3".to_string(), "extra".to_string()], 2);
        preview.push_row(vec!["4".to_string(), "5".to_string()], 2);

        assert_eq!(preview.row_count, 3);
        assert_eq!(
            preview.rows,
            vec![
                vec![Some("1".to_string()), None],
                vec![Some("2".to_string()), Some("3".to_string())],
            ]
        );
    }
}
