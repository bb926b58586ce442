//! Template renderers.

mod token;

pub use token::TokenRenderer;
