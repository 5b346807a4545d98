pub mod domain;
mod services;

pub use domain::{
    classify_error, CommandAction, CommandOutcome, CommandRequest, CommandResponse, CommandStatus,
    ResponseMeta, ScanOutput, ScanPayload, SearchOutput, SearchPayload,
};

use bpmn_protocol::{ErrorCode, ErrorEnvelope};
use services::Services;
use std::time::Instant;

pub struct CommandHandler {
    services: Services,
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            services: Services::new(),
        }
    }

    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("Executing {}", action.as_str());

        match self.services.route(action, payload).await {
            Ok(mut outcome) => {
                outcome.meta.duration_ms = outcome
                    .meta
                    .duration_ms
                    .or_else(|| Some(started.elapsed().as_millis() as u64));
                CommandResponse {
                    status: CommandStatus::Ok,
                    message: None,
                    error: None,
                    data: outcome.data,
                    meta: outcome.meta,
                }
            }
            Err(err) => error_response(&err, started.elapsed().as_millis() as u64),
        }
    }
}

pub fn error_response(err: &anyhow::Error, duration_ms: u64) -> CommandResponse {
    let message = format!("{err:#}");
    let (code, hint) = classify_error(err);
    envelope_response(code, message, hint, duration_ms)
}

pub fn envelope_response(
    code: ErrorCode,
    message: String,
    hint: Option<String>,
    duration_ms: u64,
) -> CommandResponse {
    let mut error = ErrorEnvelope::new(code, message.clone());
    if let Some(hint) = hint {
        error = error.with_hint(hint);
    }
    CommandResponse {
        status: CommandStatus::Error,
        message: Some(message),
        error: Some(error),
        data: serde_json::Value::Null,
        meta: ResponseMeta {
            duration_ms: Some(duration_ms),
            ..Default::default()
        },
    }
}

pub async fn execute(request: CommandRequest) -> CommandResponse {
    CommandHandler::new().execute(request).await
}
