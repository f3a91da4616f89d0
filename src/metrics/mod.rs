//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Este módulo implementa la recolección y agregación de métricas del
//! servidor:
//! - Contadores de requests y códigos de estado
//! - Latencias (p50, p95, p99)
//! - Threads activos
//!
//! El snapshot se expone en `GET /metrics` (ver `system::handlers`).

pub mod collector;

pub use collector::MetricsCollector;
