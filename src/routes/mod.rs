/**
 * Routes Module
 * API route handlers
 */

pub mod categories;
pub mod health;
pub mod questions;
pub mod quizzes;
