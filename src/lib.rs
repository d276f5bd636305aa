//! Visa Compass - Conversational Visa Eligibility Assessment
//!
//! This crate implements a finite-state interview that collects an
//! applicant's profile through free-text dialogue and produces a
//! deterministic, banded eligibility score with a written assessment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
