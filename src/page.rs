//! Decisions behind the structural page behaviors: the mobile menu, scroll
//! reveal, lazy images, the year stamp, link prefetching and visibility
//! pausing. The DOM bindings in `frontend` only apply what these return.

use url::Url;

pub const MENU_ANIMATION_MS: u32 = 300;
pub const REVEAL_THRESHOLD: f64 = 0.18;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -8% 0px";
pub const REVEALED: &str = "visible";
pub const PREFETCH_DELAY_MS: u32 = 120;
pub const PREFETCH_HOSTS: [&str; 3] = ["github.com", "linkedin.com", "twitter.com"];
pub const PAUSABLE_SELECTORS: [&str; 4] =
    [".bubbles .bubble", ".polaroid", ".hero-image", ".glass"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
}

impl MenuState {
    /// `Some` forces a state, `None` flips the current one.
    pub fn toggled(self, force: Option<bool>) -> Self {
        Self {
            open: force.unwrap_or(!self.open),
        }
    }

    pub fn aria_expanded(self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    pub fn body_overflow(self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Toggle,
    Close,
    Ignore,
}

impl MenuKey {
    pub fn classify(key: &str, state: MenuState) -> Self {
        match key {
            "Enter" | " " => Self::Toggle,
            "Escape" if state.open => Self::Close,
            _ => Self::Ignore,
        }
    }
}

/// Id of the in-page section an anchor `href` points at.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn should_reveal(is_intersecting: bool, current: Option<&str>) -> bool {
    is_intersecting && current != Some(REVEALED)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImageUpgrade {
    pub set_loading: bool,
    pub set_decoding: bool,
    pub src: Option<String>,
}

impl ImageUpgrade {
    pub fn plan(
        has_loading: bool,
        has_decoding: bool,
        src: Option<&str>,
        data_src: Option<&str>,
    ) -> Self {
        let src_missing = src.map_or(true, str::is_empty);
        let src = data_src
            .filter(|value| src_missing && !value.is_empty())
            .map(str::to_string);

        Self {
            set_loading: !has_loading,
            set_decoding: !has_decoding,
            src,
        }
    }
}

pub fn year_text(year: u32) -> String {
    year.to_string()
}

pub fn is_prefetch_candidate(href: &str) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };

    PREFETCH_HOSTS.iter().any(|known| {
        host == *known
            || host
                .strip_suffix(known)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Running,
}

impl PlayState {
    pub fn for_visibility(hidden: bool) -> Self {
        if hidden {
            Self::Paused
        } else {
            Self::Running
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Running => "running",
        }
    }
}
