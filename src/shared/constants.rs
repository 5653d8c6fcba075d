// =============================================================================
// CLASSIFICATION LABELS
// =============================================================================

/// Content passed moderation
pub const LABEL_SAFE: &str = "safe";

/// Highly toxic content (violence, threats)
pub const LABEL_TOXIC: &str = "toxic";

/// Unsolicited promotional content
pub const LABEL_SPAM: &str = "spam";

/// Abusive language directed at a person
pub const LABEL_HARASSMENT: &str = "harassment";

/// Canonical labels seeded into every analytics summary. Labels outside
/// this set are open-ended and tallied as encountered.
pub const CANONICAL_LABELS: [&str; 4] = [LABEL_SAFE, LABEL_TOXIC, LABEL_HARASSMENT, LABEL_SPAM];
