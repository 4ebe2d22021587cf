//! Route gating derived from session state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SessionSnapshot;

/// Which part of the application a session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gate {
    /// Stored session not loaded yet; show a spinner.
    Bootstrapping,
    /// Onboarding slides not completed.
    NeedsOnboarding,
    /// Onboarded but signed out.
    NeedsAuth,
    /// Onboarded and holding a token.
    Authenticated,
}

impl Gate {
    /// Derive the gate from a snapshot.
    ///
    /// Precedence follows the layout guard: loading, then onboarding, then
    /// the token. An empty token counts as signed out.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        if snapshot.is_loading {
            Self::Bootstrapping
        } else if !snapshot.is_onboard {
            Self::NeedsOnboarding
        } else if snapshot.session.as_deref().is_none_or(str::is_empty) {
            Self::NeedsAuth
        } else {
            Self::Authenticated
        }
    }

    /// Route a consumer should redirect to; `None` while bootstrapping.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Self::Bootstrapping => None,
            Self::NeedsOnboarding => Some("/onboarding"),
            Self::NeedsAuth => Some("/auth/signIn"),
            Self::Authenticated => Some("/"),
        }
    }

    /// Get the string representation of the gate.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrapping => "BOOTSTRAPPING",
            Self::NeedsOnboarding => "NEEDS_ONBOARDING",
            Self::NeedsAuth => "NEEDS_AUTH",
            Self::Authenticated => "AUTHENTICATED",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SessionSnapshot> for Gate {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(is_loading: bool, is_onboard: bool, session: Option<&str>) -> SessionSnapshot {
        SessionSnapshot { session: session.map(str::to_string), is_onboard, is_loading }
    }

    #[test]
    fn test_loading_wins_over_everything() {
        assert_eq!(Gate::from_snapshot(&snapshot(true, true, Some("tok"))), Gate::Bootstrapping);
        assert_eq!(Gate::Bootstrapping.route(), None);
    }

    #[test]
    fn test_onboarding_checked_before_session() {
        let gate = Gate::from_snapshot(&snapshot(false, false, Some("tok")));
        assert_eq!(gate, Gate::NeedsOnboarding);
        assert_eq!(gate.route(), Some("/onboarding"));
    }

    #[test]
    fn test_signed_out() {
        let gate = Gate::from_snapshot(&snapshot(false, true, None));
        assert_eq!(gate, Gate::NeedsAuth);
        assert_eq!(gate.route(), Some("/auth/signIn"));
    }

    #[test]
    fn test_empty_token_is_signed_out() {
        assert_eq!(Gate::from_snapshot(&snapshot(false, true, Some(""))), Gate::NeedsAuth);
    }

    #[test]
    fn test_authenticated() {
        let gate = Gate::from(&snapshot(false, true, Some("abc")));
        assert_eq!(gate, Gate::Authenticated);
        assert_eq!(gate.route(), Some("/"));
    }

    #[test]
    fn test_display_and_serde_agree() {
        for gate in [Gate::Bootstrapping, Gate::NeedsOnboarding, Gate::NeedsAuth, Gate::Authenticated] {
            let json = serde_json::to_string(&gate).unwrap();
            assert_eq!(json, format!("\"{}\"", gate));
        }
    }
}
