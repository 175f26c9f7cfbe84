//! Host environment detection.
//!
//! Strategy selection depends on a handful of signals about the browser and
//! device hosting the select. They are derived once from the user agent
//! string and then passed around by value.

use std::sync::LazyLock;

use regex::Regex;

/// `iPad`, `iPhone` and `iPod touch` platform tokens.
static IOS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\(iP(?:ad|hone|od(?: touch)?);").ok());
static ANDROID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r" Android ").ok());
static FIREFOX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r" Firefox/").ok());
static MAC_OS_X: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r" Mac OS X ").ok());
static CHROMIUM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r" (?:Chrome|Chromium|CriOS|Edg)/").ok());
static SAFARI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r" Version/[\d.]+ (?:Mobile/\w+ )?Safari/").ok());

fn is_match(pattern: &LazyLock<Option<Regex>>, user_agent: &str) -> bool {
    pattern
        .as_ref()
        .is_some_and(|regex| regex.is_match(user_agent))
}

/// A touch-first platform where assistive technology drives the native control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPlatform {
    /// iPad, iPhone or iPod touch.
    Ios,
    /// Any Android device.
    Android,
}

/// Signals about the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    /// Set on touch-first platforms.
    pub touch_platform: Option<TouchPlatform>,
    /// Gecko-based browser.
    pub firefox: bool,
    /// Desktop macOS.
    pub mac_os_x: bool,
    /// Blink-based browser.
    pub chromium: bool,
    /// WebKit-based Safari.
    pub safari: bool,
}

impl Environment {
    /// Derive the environment from a user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let touch_platform = if is_match(&IOS, user_agent) {
            Some(TouchPlatform::Ios)
        } else if is_match(&ANDROID, user_agent) {
            Some(TouchPlatform::Android)
        } else {
            None
        };

        let firefox = is_match(&FIREFOX, user_agent);
        let chromium = !firefox && is_match(&CHROMIUM, user_agent);
        Self {
            touch_platform,
            firefox,
            mac_os_x: is_match(&MAC_OS_X, user_agent),
            chromium,
            safari: !firefox && !chromium && is_match(&SAFARI, user_agent),
        }
    }

    /// Whether the device is driven by touch and touch-based assistive technology.
    pub fn is_touch_only(&self) -> bool {
        self.touch_platform.is_some()
    }

    /// Value of the touch-only meta attribute, if the attribute applies.
    ///
    /// iOS is marked explicitly; other touch platforms get an empty value.
    pub fn touch_only_attribute_value(&self) -> Option<&'static str> {
        match self.touch_platform {
            Some(TouchPlatform::Ios) => Some("ios"),
            Some(TouchPlatform::Android) => Some(""),
            None => None,
        }
    }

    /// The browser does not deliver accented characters typed via dead keys in
    /// keyboard events, so typeahead needs a diacritic-folded fallback.
    pub fn lacks_dead_key_accents(&self) -> bool {
        self.firefox
    }

    /// Plain Up/Down on the native control pops open the native dropdown
    /// instead of changing the selection.
    ///
    /// Observed on desktop macOS with non-Gecko engines. This is a narrow
    /// compatibility rule and should be revalidated against current browsers.
    pub fn arrow_keys_open_native_popup(&self) -> bool {
        self.mac_os_x && !self.firefox && !self.is_touch_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

    #[test]
    fn test_desktop_firefox() {
        let env = Environment::from_user_agent(FIREFOX_LINUX);
        assert!(env.firefox);
        assert!(!env.is_touch_only());
        assert!(env.lacks_dead_key_accents());
        assert!(!env.arrow_keys_open_native_popup());
    }

    #[test]
    fn test_desktop_safari() {
        let env = Environment::from_user_agent(SAFARI_MAC);
        assert!(env.mac_os_x);
        assert!(env.safari);
        assert!(!env.chromium);
        assert!(env.arrow_keys_open_native_popup());
        assert_eq!(env.touch_only_attribute_value(), None);
    }

    #[test]
    fn test_desktop_chrome() {
        let env = Environment::from_user_agent(CHROME_WINDOWS);
        assert!(env.chromium);
        assert!(!env.safari);
        assert!(!env.mac_os_x);
        assert!(!env.lacks_dead_key_accents());
    }

    #[test]
    fn test_touch_platforms() {
        let iphone = Environment::from_user_agent(IPHONE);
        assert_eq!(iphone.touch_platform, Some(TouchPlatform::Ios));
        assert_eq!(iphone.touch_only_attribute_value(), Some("ios"));
        assert!(!iphone.mac_os_x);

        let android = Environment::from_user_agent(ANDROID_CHROME);
        assert_eq!(android.touch_platform, Some(TouchPlatform::Android));
        assert_eq!(android.touch_only_attribute_value(), Some(""));
    }
}
