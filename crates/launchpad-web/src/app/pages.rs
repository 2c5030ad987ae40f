//! Page shells. Content comes from the backend; these only lay out chrome.

use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::AnalyticsHandle;
use crate::routes::{NAV_ROUTES, Route};
use crate::theme::{use_theme, use_theme_styles};

pub(crate) fn switch(route: Route) -> Html {
    html! { <Page route={route} /> }
}

#[derive(Properties, PartialEq)]
struct PageProps {
    route: Route,
}

#[function_component(Page)]
fn page(props: &PageProps) -> Html {
    let styles = use_theme_styles();
    let cta = matches!(props.route, Route::Home | Route::Api).then(|| {
        html! { <CallToAction /> }
    });
    // No session in the browser build.
    let session_notice = props.route.requires_session().then(|| {
        html! {
            <p style={styles.muted_text.clone()}>
                { "Sign in to manage API keys, or use `launchpad keys` from a terminal." }
            </p>
        }
    });
    html! {
        <div style={styles.page.clone()}>
            <NavBar />
            <main>
                <h1>{ props.route.label() }</h1>
                { for session_notice }
                { for cta }
            </main>
        </div>
    }
}

#[function_component(NavBar)]
fn nav_bar() -> Html {
    let theme = use_theme();
    let styles = use_theme_styles();
    let analytics = use_context::<AnalyticsHandle>();
    let on_toggle = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(analytics) = &analytics {
                analytics.track_button_click("theme_toggle", "nav");
            }
            theme.toggle();
        })
    };
    html! {
        <nav style={styles.glass_panel.clone()}>
            { for NAV_ROUTES.iter().cloned().map(|route| html! {
                <Link<Route> to={route.clone()}>{ route.label() }</Link<Route>>
            }) }
            <button style={styles.button_secondary.clone()} onclick={on_toggle}>
                { theme.mode().toggle().as_str() }
            </button>
        </nav>
    }
}

#[function_component(CallToAction)]
fn call_to_action() -> Html {
    let styles = use_theme_styles();
    let analytics = use_context::<AnalyticsHandle>();
    let navigator = use_navigator();
    {
        let analytics = analytics.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(analytics) = analytics {
                    analytics.track_cta_view("join_waitlist");
                }
                || ()
            },
            (),
        );
    }
    let onclick = Callback::from(move |_: MouseEvent| {
        if let Some(analytics) = &analytics {
            analytics.track_cta_click("join_waitlist", &Route::Waitlist.to_path());
        }
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Waitlist);
        }
    });
    html! {
        <button style={styles.button_primary.clone()} {onclick}>{ "Join the waitlist" }</button>
    }
}
