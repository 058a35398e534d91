//! Static informational content
//!
//! Tips, feature highlights, diagnostic shortcuts and quick-action queries
//! shown alongside the chat.

/// Application title
pub const TITLE: &str = "iPhone Expert";

/// Subtitle shown under the title
pub const TAGLINE: &str = "Your AI-Powered iPhone Assistant";

/// Introductory paragraph of the banner
pub const INTRO: &str = "Get instant expert help with your iPhone. From troubleshooting to \
optimization tips, I'm here to make your iPhone experience seamless and enjoyable.";

/// A pro tip with its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub title: &'static str,
    pub category: &'static str,
    pub content: &'static str,
}

/// A canned question that fills the draft input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub query: &'static str,
}

/// A feature highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

/// A diagnostic shortcut, addressed by `key` in `/diagnose <key>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticTool {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const TIPS: &[Tip] = &[
    Tip {
        title: "Battery Health Optimization",
        category: "Battery",
        content: "Enable Optimized Battery Charging in Settings > Battery > Battery Health & \
Charging. Use Low Power Mode when battery is below 20% and avoid extreme temperatures.",
    },
    Tip {
        title: "Camera Pro Tips",
        category: "Photography",
        content: "Use Portrait mode for professional-looking photos. Try different lighting \
effects like Stage Light or Studio Light. Use the timer for group photos.",
    },
    Tip {
        title: "Wi-Fi Performance",
        category: "Connectivity",
        content: "Reset network settings if experiencing connectivity issues. Go to Settings > \
General > Transfer or Reset iPhone > Reset > Reset Network Settings.",
    },
    Tip {
        title: "Privacy & Security",
        category: "Security",
        content: "Enable two-factor authentication, use Screen Time controls, and regularly \
review app permissions in Settings > Privacy & Security.",
    },
    Tip {
        title: "iOS Shortcuts",
        category: "Productivity",
        content: "Create custom shortcuts in the Shortcuts app to automate daily tasks. Try \
'Hey Siri' commands for hands-free operation.",
    },
    Tip {
        title: "Storage Management",
        category: "Storage",
        content: "Use 'Offload Unused Apps' and 'Optimize iPhone Storage' for photos. Check \
storage usage in Settings > General > iPhone Storage.",
    },
];

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        title: "Battery Issues",
        query: "My iPhone battery drains quickly. How can I fix this?",
    },
    QuickAction {
        title: "Camera Problems",
        query: "My iPhone camera is not working properly. What should I do?",
    },
    QuickAction {
        title: "iOS Update",
        query: "Should I update to the latest iOS version? What are the benefits?",
    },
    QuickAction {
        title: "Storage Full",
        query: "My iPhone storage is full. How can I free up space?",
    },
    QuickAction {
        title: "Wi-Fi Issues",
        query: "My iPhone won't connect to Wi-Fi. How do I troubleshoot this?",
    },
    QuickAction {
        title: "Security Setup",
        query: "How can I make my iPhone more secure and private?",
    },
];

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Smart Diagnostics",
        description: "AI-powered analysis of your iPhone issues with step-by-step solutions",
    },
    Feature {
        title: "Performance Optimization",
        description: "Get personalized tips to boost your iPhone's speed and battery life",
    },
    Feature {
        title: "Latest iOS Features",
        description: "Stay updated with the newest iPhone features and how to use them",
    },
    Feature {
        title: "24/7 Expert Support",
        description: "Round-the-clock assistance from our AI iPhone specialist",
    },
];

pub const DIAGNOSTIC_TOOLS: &[DiagnosticTool] = &[
    DiagnosticTool {
        key: "battery",
        title: "Check Battery Health",
        description: "Get detailed analysis of your iPhone's battery performance and \
optimization recommendations.",
        query: "Analyze my iPhone battery health and give me optimization tips",
    },
    DiagnosticTool {
        key: "performance",
        title: "Optimize Performance",
        description: "Boost your iPhone's speed and responsiveness with personalized \
optimization tips.",
        query: "How can I optimize my iPhone for better performance and speed?",
    },
    DiagnosticTool {
        key: "security",
        title: "Security Audit",
        description: "Review your iPhone's security settings and get recommendations for \
maximum protection.",
        query: "Audit my iPhone security settings and suggest improvements",
    },
    DiagnosticTool {
        key: "storage",
        title: "Storage Cleanup",
        description: "Free up space on your iPhone with smart storage management \
recommendations.",
        query: "Help me clean up my iPhone storage and free up space",
    },
];

/// Quick action by 1-based position, as listed on screen
pub fn quick_action(position: usize) -> Option<&'static QuickAction> {
    position.checked_sub(1).and_then(|i| QUICK_ACTIONS.get(i))
}

/// Diagnostic tool by key (case-insensitive)
pub fn diagnostic(key: &str) -> Option<&'static DiagnosticTool> {
    let key = key.trim().to_lowercase();
    DIAGNOSTIC_TOOLS.iter().find(|t| t.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_action_positions() {
        assert_eq!(
            quick_action(1).unwrap().query,
            "My iPhone battery drains quickly. How can I fix this?"
        );
        assert_eq!(quick_action(6).unwrap().title, "Security Setup");
        assert!(quick_action(0).is_none());
        assert!(quick_action(7).is_none());
    }

    #[test]
    fn test_diagnostic_lookup() {
        assert_eq!(diagnostic("Battery").unwrap().title, "Check Battery Health");
        assert_eq!(diagnostic("storage").unwrap().title, "Storage Cleanup");
        assert!(diagnostic("thermal").is_none());
    }

    #[test]
    fn test_content_counts() {
        assert_eq!(TIPS.len(), 6);
        assert_eq!(QUICK_ACTIONS.len(), 6);
        assert_eq!(FEATURES.len(), 4);
        assert_eq!(DIAGNOSTIC_TOOLS.len(), 4);
    }
}
