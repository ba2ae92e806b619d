use std::fmt;

/// Conclusion of one probe of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// Conclusive: an out-of-stock pattern matched the page.
    Out,
    /// Conclusive: the page looked purchasable on two reads.
    In,
    /// Inconclusive: every candidate URL failed fetch or sanity checks.
    Error,
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::Out => write!(f, "OUT"),
            ProbeVerdict::In => write!(f, "IN"),
            ProbeVerdict::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of probing a target once, with the URL that produced it and a
/// short reason code. The reason is diagnostics only and never drives
/// control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub verdict: ProbeVerdict,
    pub url: String,
    pub reason: String,
}

impl ProbeOutcome {
    pub fn out(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            verdict: ProbeVerdict::Out,
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn in_stock(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            verdict: ProbeVerdict::In,
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn error(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            verdict: ProbeVerdict::Error,
            url: url.into(),
            reason: reason.into(),
        }
    }
}
