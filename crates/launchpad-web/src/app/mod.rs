//! Application shell for wasm32 builds.

use std::ops::Deref;
use std::rc::Rc;

use launchpad_analytics::Analytics;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::browser::{browser_analytics, current_page, install_listeners, set_title};
use crate::routes::Route;

mod pages;
mod provider;

use provider::ThemeProvider;

/// Shared analytics service handed down through context.
#[derive(Clone)]
pub(crate) struct AnalyticsHandle(Rc<Analytics>);

impl PartialEq for AnalyticsHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AnalyticsHandle {
    type Target = Analytics;

    fn deref(&self) -> &Analytics {
        &self.0
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    analytics: AnalyticsHandle,
}

#[function_component(LaunchpadApp)]
fn launchpad_app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<AnalyticsHandle> context={props.analytics.clone()}>
            <ThemeProvider>
                <BrowserRouter>
                    <RouteTracker />
                    <Switch<Route> render={pages::switch} />
                </BrowserRouter>
            </ThemeProvider>
        </ContextProvider<AnalyticsHandle>>
    }
}

/// Updates the document title and reports a page view on every route change.
#[function_component(RouteTracker)]
fn route_tracker() -> Html {
    let route = use_route::<Route>().unwrap_or(Route::NotFound);
    let analytics = use_context::<AnalyticsHandle>();
    use_effect_with_deps(
        move |route: &Route| {
            set_title(&route.title());
            if let Some(analytics) = analytics {
                analytics.navigate(&current_page());
            }
            || ()
        },
        route,
    );
    Html::default()
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let analytics = Rc::new(browser_analytics());
    analytics.init(&current_page());
    if let Some(listeners) = install_listeners(&analytics) {
        listeners.forget();
    }
    let props = AppProps {
        analytics: AnalyticsHandle(analytics),
    };
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<LaunchpadApp>::with_root_and_props(root, props).render();
    } else {
        yew::Renderer::<LaunchpadApp>::with_props(props).render();
    }
}
