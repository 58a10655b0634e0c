//! Transition classification and the result returned to callers

/// How containment changed between the prior state and this evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// No prior state existed for the device
    FirstSeen,
    /// Outside before, inside now
    Entered,
    /// Inside before, outside now
    Exited,
    /// Containment flag did not change
    Unchanged,
}

impl TransitionKind {
    /// Classify a transition from the prior containment flag (if any) to the current one
    ///
    /// Only the boolean flag is compared: moving directly between two
    /// overlapping or adjacent regions is `Unchanged`.
    ///
    /// # Examples
    ///
    /// ```
    /// use geofence_domain::TransitionKind;
    ///
    /// assert_eq!(TransitionKind::between(None, true), TransitionKind::FirstSeen);
    /// assert_eq!(TransitionKind::between(Some(true), false), TransitionKind::Exited);
    /// assert_eq!(TransitionKind::between(Some(false), false), TransitionKind::Unchanged);
    /// ```
    pub fn between(prior_inside: Option<bool>, now_inside: bool) -> Self {
        match (prior_inside, now_inside) {
            (None, _) => TransitionKind::FirstSeen,
            (Some(false), true) => TransitionKind::Entered,
            (Some(true), false) => TransitionKind::Exited,
            (Some(_), _) => TransitionKind::Unchanged,
        }
    }

    /// Whether this counts as a state change for the caller
    pub fn state_changed(&self) -> bool {
        !matches!(self, TransitionKind::Unchanged)
    }

    /// Whether a boundary event must be published
    ///
    /// Only exits are published.
    pub fn publishes_event(&self) -> bool {
        matches!(self, TransitionKind::Exited)
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::FirstSeen => "first_seen",
            TransitionKind::Entered => "entered",
            TransitionKind::Exited => "exited",
            TransitionKind::Unchanged => "unchanged",
        }
    }
}

/// Outcome of evaluating one location report
///
/// Derived per call; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Evaluated device
    pub device_id: String,

    /// Whether the device is now inside some region
    pub inside: bool,

    /// Name of the containing region
    pub geofence_name: Option<String>,

    /// Whether containment differs from the prior state (or there was none)
    pub state_changed: bool,
}
