//! Fulfillment fan-out (C10) and the SMS usage meter (C11): the channels a
//! completed conversational form submission is delivered through, and the
//! per-tenant monthly cap that gates the SMS one.

pub mod archive;
pub mod bubble;
pub mod db;
pub mod http_poster;
pub mod mailer;
pub mod meter;
pub mod nested;
pub mod orchestrator;
pub mod result;
pub mod sms;

pub use archive::ArchiveStore;
pub use http_poster::{HttpPoster, PostOutcome, ReqwestHttpPoster};
pub use mailer::EmailSender;
pub use meter::{SmsUsageMeter, UsageCheck};
pub use nested::NestedInvoker;
pub use orchestrator::{fulfill, FulfillmentContext};
pub use result::ChannelResult;
pub use sms::SmsSender;
