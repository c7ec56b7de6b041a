//! Concrete implementations of the trait seams the core crates define,
//! binding them to plain HTTP (or, for the submission archive, the local
//! filesystem) since the real backends — the LLM, the vector KB, the mail/SMS
//! gateways, the nested-function front door — are external collaborators
//! this gateway never implements (spec §1 Non-goals, §9 Design Notes).

pub mod fs_archive;
pub mod http_kb;
pub mod http_llm;
pub mod http_mailer;
pub mod http_nested;
pub mod http_sms;

pub use fs_archive::{FsArchiveStore, HttpArchiveStore};
pub use http_kb::{HttpKnowledgeBase, NullKnowledgeBase};
pub use http_llm::{HttpModelStreamer, UnconfiguredModelStreamer};
pub use http_mailer::{HttpEmailSender, UnconfiguredEmailSender};
pub use http_nested::{HttpNestedInvoker, UnconfiguredNestedInvoker};
pub use http_sms::{HttpSmsSender, UnconfiguredSmsSender};
