// epiwatch-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrats vers l'extérieur : source de la table brute, destination du rapport.
pub mod ports;

// 2. Domain (Cœur du métier)
// Table brute, règles de qualité, normalisation, métriques glissantes.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// HTTP + DuckDB (source CSV, rapport), config YAML/ENV, rendu Markdown.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration (Pipeline, Profile, Clean).
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::EpiwatchError;
