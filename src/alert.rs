//! Toast alerts for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element of the page layout,
//! either as the error target of an htmx request or as part of a full page.

use maud::{Markup, html};

/// A message to show the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action completed.
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra information, may be empty.
        details: String,
    },
    /// The action failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// What went wrong and how to fix it, may be empty.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details, role) = match self {
            Alert::Success { message, details } => (
                "flex items-start p-4 mb-4 text-green-800 border border-green-300 \
                rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800",
                message,
                details,
                "status",
            ),
            Alert::Error { message, details } => (
                "flex items-start p-4 mb-4 text-red-800 border border-red-300 \
                rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800",
                message,
                details,
                "alert",
            ),
        };

        html! {
            div class=(container_style) role=(role) data-alert="true"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 text-sm font-semibold opacity-70 hover:opacity-100"
                    aria-label="Dismiss"
                    onclick="this.closest('[data-alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }
}
