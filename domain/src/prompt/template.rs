//! Persona instructions for each negotiation

use crate::negotiation::{ParticipantDescriptor, Role, SeedContext};

/// Renders the system prompt each persona negotiates under
pub struct PersonaTemplate;

impl PersonaTemplate {
    /// Build the descriptor for `role` in the negotiation described by `context`.
    pub fn descriptor(role: Role, context: &SeedContext) -> ParticipantDescriptor {
        ParticipantDescriptor::new(role, Self::instructions(role, context))
    }

    /// Full instructions for `role`: persona, task and response protocol.
    pub fn instructions(role: Role, context: &SeedContext) -> String {
        let mut prompt = String::new();
        prompt.push_str(Self::persona(role));
        prompt.push_str("\n\n");
        prompt.push_str(&Self::task(context));
        prompt.push_str("\n\n");
        prompt.push_str(&Self::protocol(role, context));
        prompt
    }

    fn persona(role: Role) -> &'static str {
        match role {
            Role::A => {
                r#"You are Zero, an enthusiastic and earnest collaborator.
You are innovative and forward-thinking, excited by emerging ideas,
direct and clear in how you communicate, and you value creativity and
practicality equally."#
            }
            Role::B => {
                r#"You are Gustave, a refined and eloquent collaborator.
You bring a sophisticated perspective, weigh every word, and help polish
rough ideas into something elegant and precise."#
            }
        }
    }

    fn task(context: &SeedContext) -> String {
        match context {
            SeedContext::Title { topic } => format!(
                "Together with your partner you are choosing the title of a book about: {}.\n\
                 Evaluate the latest suggestion thoughtfully. If there is none yet, propose an initial title.",
                topic
            ),
            SeedContext::TableOfContents { book_title } => format!(
                r#"Together with your partner you are drafting the table of contents for the book titled: {}.
Number chapters as "1. Chapter Title" and sections as "1.1. Section Title", one entry per line.
Evaluate the latest proposal and refine its structure, order and coverage."#,
                book_title
            ),
            SeedContext::Section {
                book_title,
                full_toc,
                section_number,
                section_title,
            } => format!(
                r#"Together with your partner you are writing one section of the book titled: {}.

Full table of contents:
{}

Current section: {} {}
Keep the section consistent with its place in the overall structure of the book."#,
                book_title, full_toc, section_number, section_title
            ),
        }
    }

    fn protocol(role: Role, context: &SeedContext) -> String {
        let partner = role.other().persona_name();
        let handoff = match role {
            Role::A => format!("HANDOFF: Requesting {}'s feedback", partner),
            Role::B => format!("HANDOFF: Returning to {} for input", partner),
        };
        let (noun, final_format) = match context {
            SeedContext::Title { .. } => ("title", "Consensus: True\nBook Title: [agreed title]"),
            SeedContext::TableOfContents { .. } => (
                "table of contents",
                "Consensus: True\nTable of Contents:\n[agreed table of contents]",
            ),
            SeedContext::Section { .. } => ("section", "Consensus: True\n[final section text]"),
        };

        format!(
            r#"Response rules:
1. The first line of every response is exactly "Consensus: True" or "Consensus: False".
2. With "Consensus: False", explain what you would change, propose an improved {noun}, and end with this line:
   {handoff}
3. With "Consensus: True", reply with nothing but:
{final_format}
4. After five turns, prioritize agreeing so the {noun} gets finalized.
5. Never answer in JSON and never use curly braces. Plain text only."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topic::Topic;

    #[test]
    fn test_title_prompts_differ_by_persona() {
        let ctx = SeedContext::title(Topic::try_new("ocean currents").unwrap());
        let zero = PersonaTemplate::instructions(Role::A, &ctx);
        let gustave = PersonaTemplate::instructions(Role::B, &ctx);

        assert!(zero.starts_with("You are Zero"));
        assert!(gustave.starts_with("You are Gustave"));
        assert!(zero.contains("ocean currents"));
        assert!(zero.contains("HANDOFF: Requesting Gustave's feedback"));
        assert!(gustave.contains("HANDOFF: Returning to Zero for input"));
        assert!(zero.contains("Book Title: [agreed title]"));
    }

    #[test]
    fn test_section_prompt_embeds_context() {
        let ctx = SeedContext::section(
            "Hidden Tides",
            "1. Origins\n1.1. Early Maps",
            "1.1",
            "Early Maps",
        );
        let prompt = PersonaTemplate::instructions(Role::A, &ctx);
        assert!(prompt.contains("Hidden Tides"));
        assert!(prompt.contains("1. Origins\n1.1. Early Maps"));
        assert!(prompt.contains("Current section: 1.1 Early Maps"));
        assert!(!prompt.contains("Book Title: [agreed title]"));
    }

    #[test]
    fn test_descriptor_carries_role() {
        let ctx = SeedContext::table_of_contents("Hidden Tides");
        let descriptor = PersonaTemplate::descriptor(Role::B, &ctx);
        assert_eq!(descriptor.role(), Role::B);
        assert!(descriptor.instructions().contains("Table of Contents:"));
    }
}
