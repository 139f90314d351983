//! `/agent/*` handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_include_library")]
    pub include_library: bool,
}

fn default_include_library() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct ConceptRequest {
    pub concepto: String,
}

#[derive(Debug, Deserialize)]
pub struct MechanicalElementRequest {
    pub elemento_mecanico: String,
}

#[derive(Debug, Serialize)]
pub struct DevelopResponse {
    pub concepto: String,
    pub sugerencias: String,
}

#[derive(Debug, Serialize)]
pub struct AbsurdResponse {
    pub elemento_mecanico: String,
    pub realidades_absurdas: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub concepto: String,
    pub analisis: String,
}

#[derive(Debug, Deserialize)]
pub struct ExamplesParams {
    pub tecnica: Option<String>,
    pub concepto: Option<String>,
}

pub async fn chat(
    State(state): State<SharedState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body?;
    let response = state
        .assistant
        .chat(&request.message, request.include_library)
        .await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn develop(
    State(state): State<SharedState>,
    body: Result<Json<ConceptRequest>, JsonRejection>,
) -> Result<Json<DevelopResponse>, ApiError> {
    let Json(ConceptRequest { concepto }) = body?;
    let sugerencias = state.assistant.develop(&concepto).await?;
    Ok(Json(DevelopResponse {
        concepto,
        sugerencias,
    }))
}

pub async fn absurd(
    State(state): State<SharedState>,
    body: Result<Json<MechanicalElementRequest>, JsonRejection>,
) -> Result<Json<AbsurdResponse>, ApiError> {
    let Json(MechanicalElementRequest { elemento_mecanico }) = body?;
    let realidades_absurdas = state.assistant.suggest_absurd(&elemento_mecanico).await?;
    Ok(Json(AbsurdResponse {
        elemento_mecanico,
        realidades_absurdas,
    }))
}

pub async fn analyze(
    State(state): State<SharedState>,
    body: Result<Json<ConceptRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(ConceptRequest { concepto }) = body?;
    let analisis = state.assistant.analyze(&concepto).await?;
    Ok(Json(AnalyzeResponse { concepto, analisis }))
}

pub async fn examples(
    State(state): State<SharedState>,
    params: Result<Query<ExamplesParams>, QueryRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Query(params) = params?;
    let response = state
        .assistant
        .find_examples(params.tecnica.as_deref(), params.concepto.as_deref())
        .await?;
    Ok(Json(ChatResponse { response }))
}
