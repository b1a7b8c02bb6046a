/// What the prompt text is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Jump to a matching track on submit.
    Search,
    /// Narrow the list while typing.
    Filter,
}

/// A one-line labeled text input.
#[derive(Debug, Clone)]
pub struct InputPrompt {
    kind: PromptKind,
    value: String,
    // Filter in effect when the prompt opened, restored on cancel
    previous: Option<String>,
}

impl InputPrompt {
    pub fn search() -> Self {
        Self {
            kind: PromptKind::Search,
            value: String::new(),
            previous: None,
        }
    }

    pub fn filter(current: Option<&str>) -> Self {
        Self {
            kind: PromptKind::Filter,
            value: current.unwrap_or_default().to_string(),
            previous: current.map(str::to_string),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Search => "Search",
            PromptKind::Filter => "Filter",
        }
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    /// Remove the last character; false when already empty.
    pub fn pop(&mut self) -> bool {
        self.value.pop().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_prompt_starts_from_current_pattern() {
        let mut prompt = InputPrompt::filter(Some("live"));
        assert_eq!(prompt.value(), "live");
        prompt.push('!');
        assert_eq!(prompt.value(), "live!");
        assert_eq!(prompt.previous(), Some("live"));
    }

    #[test]
    fn pop_reports_empty() {
        let mut prompt = InputPrompt::search();
        assert!(!prompt.pop());
        prompt.push('é');
        assert!(prompt.pop());
        assert_eq!(prompt.value(), "");
        assert_eq!(prompt.label(), "Search");
    }
}
