//! Newsdesk - a small news-publishing website
//!
//! This library provides the core functionality for the Newsdesk site:
//! user registration and login, moderated news listings with categories,
//! and a contact form protected by a challenge-response puzzle.

pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
pub mod web;
