//! Main module for the Fastup parser and its collaborators

pub mod arena;
pub mod error;
pub mod lexeme;
pub mod parse;
pub mod render;
pub mod store;
pub mod token;
pub mod tree;
pub mod widget;
