// Mappers: Convert between HTTP DTOs and domain models
// This keeps serde wire types isolated from business logic

use serde_json::{Map, Value};

use super::dto::{ChatRequest, SolveEquationRequest, SolveEquationResponse, UploadResponse};
use crate::domain::{
    chat_service::ChatError,
    models::{ChatMessage, Conversation, EquationRequest, SolutionSet, TabularPreview},
    value_objects::ChatRole,
};

pub fn dto_to_domain_equation(request: SolveEquationRequest) -> EquationRequest {
    EquationRequest::new(request.equation)
}

/// Convert a chat request into a validated conversation
pub fn dto_to_domain_conversation(request: ChatRequest) -> Result<Conversation, ChatError> {
    let messages = request
        .messages
        .into_iter()
        .enumerate()
        .map(|(index, message)| {
            let role = ChatRole::parse(&message.role).ok_or_else(|| {
                ChatError::InvalidConversation(format!(
                    "message {index} has unknown role '{}': expected system, user or assistant",
                    message.role
                ))
            })?;
            Ok(ChatMessage::new(role, message.content))
        })
        .collect::<Result<Vec<_>, ChatError>>()?;

    Conversation::new(messages).ok_or_else(|| {
        ChatError::InvalidConversation("at least one message is required".to_string())
    })
}

/// Convert a domain solution set into the response body
pub fn domain_to_dto_solution(solutions: &SolutionSet) -> SolveEquationResponse {
    SolveEquationResponse {
        solution: solutions.to_string(),
    }
}

/// Convert a domain preview into the response body; missing cells become `null`
pub fn domain_to_dto_preview(preview: TabularPreview) -> UploadResponse {
    let TabularPreview {
        filename,
        columns,
        row_count,
        rows,
    } = preview;

    let preview = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .cloned()
                .zip(row.into_iter().map(|cell| cell.map_or(Value::Null, Value::String)))
                .collect::<Map<String, Value>>()
        })
        .collect();

    UploadResponse {
        filename,
        columns,
        row_count,
        preview,
    }
}
