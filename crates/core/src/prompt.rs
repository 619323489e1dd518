//! Prompt building.
//!
//! Every function here is pure: the same persona, history and drafts always
//! produce the same turns, so prompts can be checked without a backend.

use crate::conversation::{ConversationTurn, Role};
use crate::persona::Persona;

const RESPONDER_TEMPLATE: &str = include_str!("prompts/responder.md");
const REVISION_TEMPLATE: &str = include_str!("prompts/revision.md");
const EVALUATOR_TEMPLATE: &str = include_str!("prompts/evaluator.md");
const EVALUATION_REQUEST_TEMPLATE: &str =
    include_str!("prompts/evaluation_request.md");

/// Returns the system prompt the responder drafts replies with.
pub fn responder_system_prompt(persona: &Persona) -> String {
    render(
        RESPONDER_TEMPLATE,
        &[
            ("NAME", persona.display_name()),
            ("PROFILE", persona.profile_text()),
        ],
    )
}

/// Returns the responder system prompt extended with a rejection notice
/// carrying the rejected draft and the evaluator's feedback.
pub fn revision_system_prompt(
    persona: &Persona,
    prior_draft: &str,
    feedback: &str,
) -> String {
    let mut prompt = responder_system_prompt(persona);
    prompt.push_str(&render(
        REVISION_TEMPLATE,
        &[("DRAFT", prior_draft), ("FEEDBACK", feedback)],
    ));
    prompt
}

/// Builds the turns of a drafting request: the system prompt, the
/// caller's history, then the new message.
pub fn responder_messages(
    system_prompt: &str,
    history: &[ConversationTurn],
    message: &str,
) -> Vec<ConversationTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ConversationTurn::system(system_prompt));
    turns.extend_from_slice(history);
    turns.push(ConversationTurn::user(message));
    turns
}

/// Builds the turns of a revision request.
pub fn revision_messages(
    persona: &Persona,
    prior_draft: &str,
    feedback: &str,
    history: &[ConversationTurn],
    message: &str,
) -> Vec<ConversationTurn> {
    let system_prompt = revision_system_prompt(persona, prior_draft, feedback);
    responder_messages(&system_prompt, history, message)
}

/// Returns the system prompt of the evaluator.
pub fn evaluator_system_prompt(persona: &Persona) -> String {
    render(
        EVALUATOR_TEMPLATE,
        &[
            ("NAME", persona.display_name()),
            ("PROFILE", persona.profile_text()),
        ],
    )
}

/// Returns the user prompt asking the evaluator to judge `reply`.
pub fn evaluator_user_prompt(
    reply: &str,
    message: &str,
    history: &[ConversationTurn],
) -> String {
    render(
        EVALUATION_REQUEST_TEMPLATE,
        &[
            ("HISTORY", &transcript(history)),
            ("MESSAGE", message),
            ("REPLY", reply),
        ],
    )
}

/// Renders the history as a plain `User:` / `Agent:` transcript.
fn transcript(history: &[ConversationTurn]) -> String {
    let lines = history
        .iter()
        .filter_map(|turn| {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Agent",
                Role::ToolResult => "Tool",
                Role::System => return None,
            };
            Some(format!("{speaker}: {}", turn.content))
        })
        .collect::<Vec<_>>();
    if lines.is_empty() {
        return "(no earlier messages)".to_owned();
    }
    lines.join("\n")
}

/// Replaces every `{{KEY}}` in `template` with its value.
///
/// Substitution is a single pass, so placeholders inside values are kept
/// as they are. Unknown keys are left untouched.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> Persona {
        Persona::new("Ada Lovelace", "# Ada\n\nWrote the first program.")
    }

    #[test]
    fn test_render() {
        assert_eq!(render("Hi {{NAME}}!", &[("NAME", "Ada")]), "Hi Ada!");
        assert_eq!(
            render("{{A}}{{B}}", &[("A", "{{B}}"), ("B", "x")]),
            "{{B}}x"
        );
        assert_eq!(render("{{UNKNOWN}} {{", &[]), "{{UNKNOWN}} {{");
    }

    #[test]
    fn test_responder_system_prompt() {
        let prompt = responder_system_prompt(&persona());
        assert!(prompt.starts_with("You are acting as Ada Lovelace."));
        assert!(prompt.contains("Wrote the first program."));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_responder_messages() {
        let history = vec![
            ConversationTurn::user("Hi"),
            ConversationTurn::assistant("Hello!"),
        ];
        let turns = responder_messages("system", &history, "Who are you?");
        assert_eq!(
            turns,
            vec![
                ConversationTurn::system("system"),
                ConversationTurn::user("Hi"),
                ConversationTurn::assistant("Hello!"),
                ConversationTurn::user("Who are you?"),
            ]
        );
    }

    #[test]
    fn test_revision_messages() {
        let turns = revision_messages(
            &persona(),
            "I invented the telephone.",
            "Not in the profile.",
            &[],
            "What did you invent?",
        );
        assert_eq!(turns.len(), 2);

        let system = &turns[0];
        assert_eq!(system.role, Role::System);
        assert!(
            system
                .content
                .starts_with(&responder_system_prompt(&persona()))
        );
        assert!(system.content.contains("## Previous answer rejected"));
        assert!(system.content.contains("I invented the telephone."));
        assert!(system.content.contains("Not in the profile."));
        assert_eq!(turns[1], ConversationTurn::user("What did you invent?"));
    }

    #[test]
    fn test_evaluator_prompts() {
        let system = evaluator_system_prompt(&persona());
        assert!(system.contains("playing the role of Ada Lovelace"));
        assert!(system.contains("Wrote the first program."));

        let history = vec![
            ConversationTurn::system("ignored"),
            ConversationTurn::user("Hi"),
            ConversationTurn::assistant("Hello!"),
        ];
        let user = evaluator_user_prompt("I'm Ada.", "Who are you?", &history);
        assert!(user.contains("User: Hi\nAgent: Hello!"));
        assert!(!user.contains("ignored"));
        assert!(user.contains("Who are you?"));
        assert!(user.contains("I'm Ada."));

        let user = evaluator_user_prompt("I'm Ada.", "Who are you?", &[]);
        assert!(user.contains("(no earlier messages)"));
    }
}
