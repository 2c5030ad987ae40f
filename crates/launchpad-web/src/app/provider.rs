//! Theme provider: owns the mode and mirrors tokens onto the document root.

use std::rc::Rc;
use std::sync::Arc;

use gloo::console;
use launchpad_theme::{Theme, ThemeController, ThemeMode};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::browser::LocalPreferenceStore;
use crate::theme::{ThemeContext, ThemeTarget, mirror_theme};

#[derive(Properties, PartialEq)]
pub(crate) struct ThemeProviderProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ThemeProvider)]
pub(crate) fn theme_provider(props: &ThemeProviderProps) -> Html {
    let controller = use_mut_ref(|| ThemeController::load(LocalPreferenceStore));
    let theme = {
        let controller = Rc::clone(&controller);
        use_state(move || controller.borrow().theme())
    };
    let set_mode = {
        let controller = Rc::clone(&controller);
        let theme = theme.clone();
        use_callback(
            move |mode: ThemeMode, _| {
                let next = controller.borrow_mut().set_mode(mode);
                theme.set(next);
            },
            (),
        )
    };
    use_effect_with_deps(
        |theme: &Arc<Theme>| {
            mirror_onto_document(theme);
            || ()
        },
        (*theme).clone(),
    );

    let context = ThemeContext::new((*theme).clone(), set_mode);
    html! {
        <ContextProvider<ThemeContext> context={context}>
            { for props.children.iter() }
        </ContextProvider<ThemeContext>>
    }
}

struct DocumentRoot(HtmlElement);

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl ThemeTarget for DocumentRoot {
    fn set_property(&self, name: &str, value: &str) -> Result<(), String> {
        self.0
            .style()
            .set_property(name, value)
            .map_err(|err| describe(&err))
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), String> {
        self.0
            .set_attribute(name, value)
            .map_err(|err| describe(&err))
    }
}

fn mirror_onto_document(theme: &Theme) {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
        .and_then(|root| root.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    for failure in mirror_theme(&DocumentRoot(root), theme) {
        console::warn!("theme mirroring failed", failure);
    }
}
