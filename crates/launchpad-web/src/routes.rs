//! The site's single route table.

use yew_router::prelude::*;

/// Every page the site serves.
#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    /// Landing page.
    #[at("/")]
    Home,
    /// Waitlist signup.
    #[at("/waitlist")]
    Waitlist,
    /// API product showcase.
    #[at("/api")]
    Api,
    /// Blog index.
    #[at("/blog")]
    Blog,
    /// Single blog post, addressed by slug or id.
    #[at("/blog/:slug")]
    BlogPost {
        /// Post slug or id.
        slug: String,
    },
    /// Feedback board.
    #[at("/feedback")]
    Feedback,
    /// API key management.
    #[at("/api-keys")]
    ApiKeys,
    /// Fallback for unknown paths.
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Suffix appended to every document title.
pub const SITE_NAME: &str = "Launchpad";

/// Routes shown in the primary navigation, in display order.
pub const NAV_ROUTES: [Route; 5] = [
    Route::Home,
    Route::Api,
    Route::Blog,
    Route::Feedback,
    Route::Waitlist,
];

impl Route {
    /// Short label for navigation links.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Waitlist => "Join the waitlist",
            Self::Api => "API",
            Self::Blog | Self::BlogPost { .. } => "Blog",
            Self::Feedback => "Feedback",
            Self::ApiKeys => "API keys",
            Self::NotFound => "Not found",
        }
    }

    /// Document title for the page.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Home => format!("{SITE_NAME} | Ship faster"),
            Self::BlogPost { slug } => format!("{} | Blog | {SITE_NAME}", humanize_slug(slug)),
            other => format!("{} | {SITE_NAME}", other.label()),
        }
    }

    /// Whether the page requires a signed-in caller.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(self, Self::ApiKeys)
    }
}

fn humanize_slug(slug: &str) -> String {
    let words: Vec<String> = slug
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();
    if words.is_empty() {
        slug.to_string()
    } else {
        words.join(" ")
    }
}
