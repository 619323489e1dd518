use std::sync::{Arc, LazyLock};

use persona_agent_core::tool::{Error as ToolError, Tool, ToolContext, ToolResult};
use regex::Regex;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"));

type OnRecord = Arc<dyn Fn(&ContactRecord) + Send + Sync>;

/// Arguments of [`RecordContactTool`].
#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordContactParameters {
    #[schemars(description = "The email address of this user.")]
    email: String,
    #[schemars(description = "The user's name, if they provided it.")]
    name: Option<String>,
    #[schemars(
        description = "Any additional information about the conversation that's worth recording to give context."
    )]
    notes: Option<String>,
}

/// The contact details a visitor left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// The validated email address.
    pub email: String,
    /// The visitor's name, as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form context about the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of [`RecordContactTool`].
#[derive(Serialize)]
pub struct RecordContactOutput {
    status: &'static str,
    recorded: ContactRecord,
}

/// A tool for recording that a visitor wants to get in touch.
///
/// Every record is logged. Hosts that want to persist records can attach a
/// callback with [`RecordContactTool::on_record`].
pub struct RecordContactTool {
    parameter_schema: Value,
    on_record: Option<OnRecord>,
}

impl RecordContactTool {
    /// Creates a new record contact tool.
    #[inline]
    pub fn new() -> Self {
        RecordContactTool {
            parameter_schema: schema_for!(RecordContactParameters).to_value(),
            on_record: None,
        }
    }

    /// Attaches a callback invoked with every accepted record.
    #[inline]
    pub fn on_record(
        mut self,
        on_record: impl Fn(&ContactRecord) + Send + Sync + 'static,
    ) -> Self {
        self.on_record = Some(Arc::new(on_record));
        self
    }
}

impl Default for RecordContactTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for RecordContactTool {
    type Input = RecordContactParameters;
    type Output = RecordContactOutput;

    fn name(&self) -> &str {
        "record_user_details"
    }

    fn description(&self) -> &str {
        "Use this tool to record that a user is interested in being in touch and provided an email address."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        _context: ToolContext,
        input: RecordContactParameters,
    ) -> impl Future<Output = ToolResult<RecordContactOutput>> + Send + 'static
    {
        let on_record = self.on_record.clone();
        async move {
            let email = input.email.trim();
            if !is_valid_email(email)? {
                return Err(ToolError::invalid_argument()
                    .with_reason(format!("`{email}` is not a valid email address")));
            }

            let record = ContactRecord {
                email: email.to_owned(),
                name: input.name,
                notes: input.notes,
            };
            info!(
                email = %record.email,
                name = record.name.as_deref().unwrap_or_default(),
                notes = record.notes.as_deref().unwrap_or_default(),
                "recorded contact details"
            );
            if let Some(on_record) = on_record {
                on_record(&record);
            }

            Ok(RecordContactOutput {
                status: "success",
                recorded: record,
            })
        }
    }
}

fn is_valid_email(email: &str) -> ToolResult<bool> {
    let pattern = EMAIL_PATTERN.as_ref().map_err(|err| {
        ToolError::execution_error().with_reason(err.to_string())
    })?;
    Ok(pattern.is_match(email))
}
