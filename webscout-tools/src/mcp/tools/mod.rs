//! MCP tool implementations organized by domain

pub mod web;
