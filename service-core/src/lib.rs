//! service-core: Shared infrastructure for the RAG microservices.
pub mod clients;
pub mod config;
pub mod error;
pub mod observability;
