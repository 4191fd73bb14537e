//! Conversation window reconstruction
//!
//! The planner never sees the raw turn log. It sees (input, output) pairs
//! built from turns `2i` and `2i + 1`, regardless of their roles. A trailing
//! turn without a partner is left out of the window.

use super::Turn;

/// One (input, output) exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Text of the even-indexed turn
    pub input: String,
    /// Text of the following turn
    pub output: String,
}

/// Paired reconstruction of a session, oldest exchange first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationWindow {
    exchanges: Vec<Exchange>,
}

impl ConversationWindow {
    /// Build a window from a turn log
    #[must_use]
    pub fn from_turns(turns: &[Turn]) -> Self {
        let exchanges = turns
            .chunks_exact(2)
            .map(|pair| Exchange {
                input: pair[0].text.clone(),
                output: pair[1].text.clone(),
            })
            .collect();
        Self { exchanges }
    }

    /// The exchanges, oldest first
    #[must_use]
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Number of exchanges
    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// True when there is no prior exchange
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Render as a `Human:`/`AI:` transcript, one line per message
    #[must_use]
    pub fn render(&self) -> String {
        self.exchanges
            .iter()
            .map(|e| format!("Human: {}\nAI: {}", e.input, e.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reconstruct the window for a turn log
#[must_use]
pub fn reconstruct_window(turns: &[Turn]) -> ConversationWindow {
    ConversationWindow::from_turns(turns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("t{i}"))
                } else {
                    Turn::assistant(format!("t{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_even_length_pairs_every_turn() {
        for n in 0..6 {
            let log = turns(2 * n);
            let window = reconstruct_window(&log);
            assert_eq!(window.len(), n);
            for (i, exchange) in window.exchanges().iter().enumerate() {
                assert_eq!(exchange.input, log[2 * i].text);
                assert_eq!(exchange.output, log[2 * i + 1].text);
            }
        }
    }

    #[test]
    fn test_odd_length_drops_trailing_turn() {
        for n in 0..6 {
            let log = turns(2 * n + 1);
            let window = reconstruct_window(&log);
            assert_eq!(window.len(), n);
            let last = log.last().unwrap();
            assert!(window.exchanges().iter().all(|e| e.input != last.text));
        }
    }

    #[test]
    fn test_pairing_ignores_roles() {
        let log = vec![Turn::user("a"), Turn::user("b"), Turn::assistant("c")];
        let window = reconstruct_window(&log);
        assert_eq!(
            window.exchanges(),
            &[Exchange {
                input: "a".to_string(),
                output: "b".to_string()
            }]
        );
    }

    #[test]
    fn test_render_transcript() {
        let log = vec![
            Turn::user("Is the house on Elm still available?"),
            Turn::assistant("Yes, it is."),
            Turn::user("Great"),
            Turn::assistant("Anything else?"),
        ];
        let rendered = reconstruct_window(&log).render();
        assert_eq!(
            rendered,
            "Human: Is the house on Elm still available?\nAI: Yes, it is.\nHuman: Great\nAI: Anything else?"
        );
        assert_eq!(ConversationWindow::default().render(), "");
    }
}
