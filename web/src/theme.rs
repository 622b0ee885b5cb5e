use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ATTR_NAME: &'static str = "data-theme";
    pub const KEY: &'static str = "wordsnake:theme";

    pub(crate) const fn scheme(self) -> &'static str {
        use Theme::*;
        match self {
            Light => "light",
            Dark => "dark",
        }
    }

    fn update_html(theme: Option<Self>) {
        use gloo::utils::document;
        let html = document()
            .query_selector("html")
            .expect("query must be correct")
            .expect("must have html element");
        if let Some(theme) = theme {
            let scheme = theme.scheme();
            log::debug!("theme-scheme: {}", scheme);
            if let Err(err) = html.set_attribute(Self::ATTR_NAME, scheme) {
                log::error!("failed to set theme: {:?}", err);
            }
        } else {
            log::debug!("no theme preference");
            if let Err(err) = html.remove_attribute(Self::ATTR_NAME) {
                log::error!("failed to set theme: {:?}", err);
            }
        }
    }

    pub(crate) fn init() {
        use gloo::storage::{LocalStorage, Storage};
        Self::update_html(LocalStorage::get(Self::KEY).ok());
    }

    /// `None` falls back to the browser preference.
    pub(crate) fn apply(theme: Option<Self>) {
        use gloo::storage::{LocalStorage, Storage};
        match theme {
            Some(theme) => {
                if let Err(err) = LocalStorage::set(Self::KEY, theme) {
                    log::error!("failed to persist theme: {:?}", err);
                }
            }
            None => LocalStorage::delete(Self::KEY),
        }
        Self::update_html(theme);
    }
}
