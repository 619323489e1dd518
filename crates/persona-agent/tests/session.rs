use std::sync::{Arc, Mutex};

use persona_agent::SessionBuilder;
use persona_agent::core::{ConversationTurn, Error, Persona};
use persona_agent::tools::ContactRecord;
use persona_agent_model::{ErrorKind, ModelMessage};
use persona_agent_test_model::{PresetResponse, TestModelProvider};
use serde_json::json;

fn accept() -> PresetResponse {
    PresetResponse::json(json!({ "is_acceptable": true, "feedback": "Good." }))
}

fn persona() -> Persona {
    Persona::new("Ada Lovelace", "Wrote the first published program.")
}

#[tokio::test]
async fn test_history_grows_with_each_reply() {
    let responder = TestModelProvider::with_responses([
        PresetResponse::text("Hi, I'm Ada."),
        PresetResponse::text("Mostly analytical engines."),
    ]);
    let evaluator = TestModelProvider::with_responses([accept(), accept()]);
    let mut session = SessionBuilder::new(persona(), responder.clone(), evaluator)
        .build()
        .unwrap();

    session.send_message("Who are you?").await.unwrap();
    let reply = session.send_message("What do you work on?").await.unwrap();
    assert_eq!(reply, "Mostly analytical engines.");
    assert_eq!(
        session.history(),
        [
            ConversationTurn::user("Who are you?"),
            ConversationTurn::assistant("Hi, I'm Ada."),
            ConversationTurn::user("What do you work on?"),
            ConversationTurn::assistant("Mostly analytical engines."),
        ]
    );

    // The second request replays the first exchange.
    let messages = &responder.requests()[1].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], ModelMessage::Assistant("Hi, I'm Ada.".to_owned()));

    session.reset();
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_failed_message_leaves_history() {
    let responder = TestModelProvider::with_responses([
        PresetResponse::Failure(ErrorKind::RateLimitExceeded),
        PresetResponse::text("Hello!"),
    ]);
    let evaluator = TestModelProvider::with_responses([accept()]);
    let mut session = SessionBuilder::new(persona(), responder, evaluator)
        .build()
        .unwrap();

    let err = session.send_message("Hi").await.unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable { .. }));
    assert!(session.history().is_empty());

    assert_eq!(session.send_message("Hi").await.unwrap(), "Hello!");
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_contact_details_are_recorded() {
    let responder = TestModelProvider::with_responses([
        PresetResponse::tool_call(
            "call_1",
            "record_user_details",
            json!({ "email": "john@acme.com", "name": "John" }),
        ),
        PresetResponse::text("Thanks John, I'll be in touch!"),
        PresetResponse::tool_call(
            "call_2",
            "record_user_details",
            json!({ "email": "foo@bar" }),
        ),
    ]);
    let evaluator = TestModelProvider::with_responses([accept()]);
    let records = Arc::new(Mutex::new(Vec::<ContactRecord>::new()));
    let mut session =
        SessionBuilder::new(persona(), responder.clone(), evaluator)
            .on_contact_recorded({
                let records = records.clone();
                move |record| records.lock().unwrap().push(record.clone())
            })
            .build()
            .unwrap();

    let outcome = session
        .send_message_with_outcome("Here's my email, john@acme.com, let's talk")
        .await
        .unwrap();
    assert_eq!(outcome.reply, "Thanks John, I'll be in touch!");
    assert_eq!(outcome.tool_calls, 1);
    assert_eq!(
        *records.lock().unwrap(),
        [ContactRecord {
            email: "john@acme.com".to_owned(),
            name: Some("John".to_owned()),
            notes: None,
        }]
    );

    let request = &responder.requests()[0];
    assert_eq!(request.tools.len(), 1);
    assert_eq!(request.tools[0].name, "record_user_details");

    let err = session.send_message("Also foo@bar").await.unwrap_err();
    assert!(matches!(
        err,
        Error::ToolExecutionFailure { ref name, .. } if name == "record_user_details"
    ));
    assert_eq!(records.lock().unwrap().len(), 1);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_tool_round_limit() {
    let responder = TestModelProvider::with_responses([
        PresetResponse::tool_call(
            "call_1",
            "record_user_details",
            json!({ "email": "john@acme.com" }),
        ),
    ]);
    let evaluator = TestModelProvider::default();
    let mut session = SessionBuilder::new(persona(), responder, evaluator)
        .with_max_tool_rounds(0)
        .build()
        .unwrap();

    let err = session.send_message("Hi").await.unwrap_err();
    assert!(matches!(err, Error::ToolRoundLimitExceeded { limit: 0 }));
}
