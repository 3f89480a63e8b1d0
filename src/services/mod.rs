// ABOUTME: Domain service layer for the relay's two operations
// ABOUTME: Session ingestion into the index and grounded coaching replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers only parse and authenticate; everything that touches the
//! filesystem or an external service lives here.

/// Coach Query Responder
pub mod coach;

/// Session Ingestor
pub mod ingest;

pub use coach::CoachService;
pub use ingest::{IngestOutcome, IngestService};
