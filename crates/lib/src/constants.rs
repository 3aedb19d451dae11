//! # Shared Constants
//!
//! Constants shared across the `edgecoach` workspace crates.

/// Prefix marking the hidden conversation-state record inside a system message.
pub const STATE_PREFIX: &str = "__agent_state__:";

/// The reply used when the general-answer backend is unavailable.
pub const GENERAL_FALLBACK_ANSWER: &str = "I'm here! How can I help you?";

/// The reply used when interview intel is requested without a company or role.
pub const CLARIFICATION_ANSWER: &str = "Happy to help you prepare! Which company and role is the interview for? Once I know that, I can pull real candidate experiences and build a prep plan.";

/// The takeaway used when detailed synthesis was unavailable.
pub const SYNTHESIS_UNAVAILABLE_TAKEAWAY: &str = "Detailed interview synthesis was unavailable right now. Review the listed sources directly and try again shortly for a full prep guide.";

/// The takeaway appended when the backend produced a guide without any.
pub const DEFAULT_TAKEAWAY: &str = "Prepare concrete stories for your past work, practice out loud, and go in calm: you have done the work.";

/// User agent sent with every page fetch.
pub const USER_AGENT: &str = "InterviewIntelAgent/1.0";

/// Bounds for the hours-until-interview estimate.
pub const MIN_HOURS: u32 = 1;
pub const MAX_HOURS: u32 = 336;
pub const DEFAULT_HOURS: u32 = 24;
