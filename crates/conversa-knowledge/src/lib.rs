pub mod retriever;

pub use retriever::{KnowledgeBase, KnowledgeRetriever, Passage};
