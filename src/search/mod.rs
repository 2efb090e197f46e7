//! Search: blended vector + lexical scoring and the resolver that picks
//! between the semantic path, tag filtering, and the keyword fallback.

pub mod hybrid;
pub mod resolver;
