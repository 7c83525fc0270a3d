//! API DTOs (Data Transfer Objects)
//!
//! Resource bodies are schemaless JSON; only the aggregate responses have
//! a fixed shape.

use query::Document;
use serde::Serialize;

/// `data: {stats}` of `GET /tour-stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    pub stats: Vec<Document>,
}

/// `data: {plan}` of `GET /monthly-plan/{year}`
#[derive(Debug, Clone, Serialize)]
pub struct PlanData {
    pub plan: Vec<Document>,
}
