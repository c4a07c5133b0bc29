//! # BARQ/BULLET Dispatch
//!
//! Driver-order matching and fleet coverage engine for the BARQ (on-demand,
//! 15-30 minute) and BULLET (scheduled, batched) delivery tiers.
//!
//! ## Overview
//!
//! This crate provides three collaborating engines, each independently
//! usable against a [`model::FleetSnapshot`]:
//!
//! - **Order Assignment** ([`dispatch`]): scores and assigns drivers to
//!   incoming orders per tier, with emergency escalation and queueing when
//!   no driver qualifies.
//! - **Fleet Rebalancing** ([`rebalancer`]): classifies grid-cell coverage,
//!   prioritizes gaps, and proposes repositioning actions for idle drivers.
//! - **Route Enhancement** ([`routing`]): filters restricted-area stops and
//!   augments a route with distance/duration/geometry from an external
//!   router, falling back to fixed estimates when the router is down.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use barq_bullet_dispatch::config::EngineConfig;
//! use barq_bullet_dispatch::dispatch::{AssignmentDeps, OrderAssignmentEngine};
//! use barq_bullet_dispatch::model::FleetSnapshot;
//!
//! let engine = OrderAssignmentEngine::new(EngineConfig::default());
//! let snapshot = FleetSnapshot::from_drivers(vec![]);
//! assert!(engine.recent_assignment_counts().is_empty());
//! let _ = snapshot.all();
//! ```

pub mod collaborators;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod geo;
pub mod grid;
pub mod model;
pub mod rebalancer;
pub mod routefit;
pub mod routing;
pub mod scoring;

pub use errors::EngineError;
