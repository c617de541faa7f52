//! Prompt templates for each dispatch round

use crate::agent::descriptor::AgentId;

/// Preamble sent before every round-1 question unless configured otherwise
pub const DEFAULT_PREAMBLE: &str = "You are one model in a distributed local ensemble. \
Return only the final answer, very short, with no explanation.";

/// Templates for generating prompts at each round
pub struct PromptTemplate;

impl PromptTemplate {
    /// Round-1 prompt shared by every strategy
    pub fn initial_query(question: &str, preamble: &str) -> String {
        format!("{}\n\nQuestion:\n{}", preamble.trim(), question)
    }

    /// Round-2 debate prompt for one agent.
    ///
    /// `peers` are the other agents' normalized round-1 answers; the
    /// receiving agent is never among them.
    pub fn debate_round(question: &str, previous: Option<&str>, peers: &[(AgentId, String)]) -> String {
        let mut prompt = format!(
            "Round 2 debate. Compare with your peers and revise your answer if needed.\n\
Original question:\n{}\n\n\
Your previous answer: {}\n",
            question,
            previous.unwrap_or("(none)")
        );

        prompt.push_str("Peer answers:\n");
        if peers.is_empty() {
            prompt.push_str("- (no peer answered)\n");
        }
        for (agent, answer) in peers {
            prompt.push_str(&format!("- {}: {}\n", agent, answer));
        }

        prompt.push_str("\nReturn only your revised final answer in one short line.");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_query() {
        let prompt = PromptTemplate::initial_query("What is 2+2?", DEFAULT_PREAMBLE);
        assert!(prompt.starts_with("You are one model"));
        assert!(prompt.ends_with("Question:\nWhat is 2+2?"));
    }

    #[test]
    fn test_debate_round_lists_peers() {
        let peers = vec![
            (AgentId::from("b"), "A".to_string()),
            (AgentId::from("c"), "B".to_string()),
        ];
        let prompt = PromptTemplate::debate_round("Pick one", Some("B"), &peers);
        assert!(prompt.contains("Original question:\nPick one"));
        assert!(prompt.contains("Your previous answer: B"));
        assert!(prompt.contains("- b: A\n- c: B\n"));
        assert!(prompt.ends_with("one short line."));
    }

    #[test]
    fn test_debate_round_without_history() {
        let prompt = PromptTemplate::debate_round("q", None, &[]);
        assert!(prompt.contains("Your previous answer: (none)"));
        assert!(prompt.contains("(no peer answered)"));
    }
}
